use thiserror::Error;

pub type SightResult<T> = Result<T, SightError>;

#[derive(Error, Debug)]
pub enum SightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet decode error: {0}")]
    Decode(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Analysis request error: {0}")]
    Analysis(String),

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Export error: {0}")]
    Export(String),
}
