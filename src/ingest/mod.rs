//! Spreadsheet ingestion: .xlsx/.xls/.csv → [`Dataset`].
//!
//! Binary decoding is delegated to calamine; CSV to the csv crate. Only the
//! first sheet of a workbook is read. The first row becomes the header row,
//! coerced to text; everything after it is data.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};

use crate::error::{SightError, SightResult};
use crate::types::{Cell, Dataset};

/// Extensions the upload surface accepts. Content is never validated against
/// the extension; a mislabeled file simply fails to decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// Reads one spreadsheet file into a rectangular dataset.
pub struct SpreadsheetImporter {
    path: PathBuf,
}

impl SpreadsheetImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Decode the file into a dataset, dispatching on the file extension.
    ///
    /// An empty first sheet yields an empty dataset (no headers, no rows).
    /// On failure nothing is produced, so a caller's previously loaded
    /// dataset stays untouched.
    pub fn import(&self) -> SightResult<Dataset> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => self.import_workbook::<Xlsx<BufReader<File>>>(),
            "xls" => self.import_workbook::<Xls<BufReader<File>>>(),
            "csv" => self.import_csv(),
            other => Err(SightError::UnsupportedFormat(format!(
                "{:?} (expected one of {})",
                other,
                SUPPORTED_EXTENSIONS.join(", ")
            ))),
        }
    }

    fn import_workbook<R>(&self) -> SightResult<Dataset>
    where
        R: Reader<BufReader<File>>,
        R::Error: fmt::Display,
    {
        let mut workbook: R = open_workbook(&self.path).map_err(|e| {
            SightError::Decode(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        // First sheet only; extra sheets are silently ignored.
        let sheet_names = workbook.sheet_names().to_vec();
        let Some(first_sheet) = sheet_names.first() else {
            return Ok(Dataset::default());
        };

        let range = workbook.worksheet_range(first_sheet).map_err(|e| {
            SightError::Decode(format!("failed to read sheet {first_sheet:?}: {e}"))
        })?;

        Ok(Self::range_to_dataset(&range))
    }

    /// Convert a decoded sheet range into headers + rows. The range is
    /// rectangular, so every row comes out at the full sheet width with
    /// absent cells padded as empty text.
    fn range_to_dataset(range: &Range<Data>) -> Dataset {
        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            return Dataset::default();
        }

        let mut headers = Vec::with_capacity(width);
        for col in 0..width {
            let name = match range.get((0, col)) {
                Some(Data::String(s)) => s.clone(),
                Some(Data::Empty) | None => format!("col_{}", col),
                Some(cell) => cell.to_string(),
            };
            headers.push(name);
        }

        let mut rows = Vec::with_capacity(height.saturating_sub(1));
        for row in 1..height {
            let mut cells = Vec::with_capacity(width);
            for col in 0..width {
                cells.push(match range.get((row, col)) {
                    Some(Data::Float(f)) => Cell::Number(*f),
                    Some(Data::Int(i)) => Cell::Number(*i as f64),
                    Some(Data::String(s)) => Cell::Text(s.clone()),
                    Some(Data::Empty) | None => Cell::text(""),
                    Some(cell) => Cell::Text(cell.to_string()),
                });
            }
            rows.push(cells);
        }

        Dataset::new(headers, rows)
    }

    fn import_csv(&self) -> SightResult<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(first) => first?.iter().map(|field| field.trim().to_string()).collect(),
            None => return Ok(Dataset::default()),
        };

        let width = headers.len();
        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            // ragged records are padded (or truncated) to the header width
            let mut cells: Vec<Cell> = record.iter().take(width).map(Cell::parse).collect();
            cells.resize(width, Cell::text(""));
            rows.push(cells);
        }

        Ok(Dataset::new(headers, rows))
    }
}
