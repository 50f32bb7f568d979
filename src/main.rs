use clap::{Parser, Subcommand};
use sheetsight::cli;
use sheetsight::error::SightResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetsight")]
#[command(about = "Financial spreadsheet dashboard: tables, AI analysis, charts, PDF reports.")]
#[command(long_about = "Sheetsight - financial spreadsheet dashboard

Loads .xlsx/.xls/.csv files and turns them into a searchable table,
an AI-generated financial analysis, synthetic charts, and a one-page
PDF report.

COMMANDS:
  inspect  - Print the formatted table, optionally filtered
  analyze  - Run an AI analysis (remote endpoint or built-in mock)
  charts   - Write revenue/expense/forecast charts as PNG files
  export   - Export the charts view as a one-page A4 PDF

EXAMPLES:
  sheetsight inspect report.xlsx --query 2024
  sheetsight analyze report.xlsx --mock
  sheetsight charts report.xlsx --output charts/
  sheetsight export report.xlsx --output report.pdf

The HTTP API lives in the separate sheetsight-server binary.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Print the spreadsheet as a formatted table.

The first sheet is decoded into headers plus data rows. Columns are
formatted by header semantics: money columns get ru-RU digit grouping
and a ruble suffix, percentage columns become signed badges colored by
sign, everything else prints as-is.

--query keeps only the rows where some cell contains the text,
case-insensitively.")]
    /// Print the formatted, optionally filtered table
    Inspect {
        /// Path to spreadsheet file (.xlsx, .xls, .csv)
        file: PathBuf,

        /// Keep only rows containing this text (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,
    },

    #[command(long_about = "Run an AI financial analysis over the spreadsheet.

By default the dataset is POSTed as JSON to the analysis endpoint and
the response is printed as summary metrics, insights, and
recommendations. --mock skips the network entirely and serves a canned
summary after a fixed delay, which is useful for demos and offline
work.")]
    /// Run an AI analysis (remote endpoint or built-in mock)
    Analyze {
        /// Path to spreadsheet file (.xlsx, .xls, .csv)
        file: PathBuf,

        /// Use the built-in mock instead of the remote endpoint
        #[arg(long, env = "SHEETSIGHT_MOCK")]
        mock: bool,

        /// Analysis endpoint URL (remote mode)
        #[arg(long, env = "SHEETSIGHT_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Write revenue/expense/forecast charts as PNG files
    Charts {
        /// Path to spreadsheet file (.xlsx, .xls, .csv)
        file: PathBuf,

        /// Directory the PNG files are written into
        #[arg(short, long, default_value = "charts")]
        output: PathBuf,
    },

    #[command(long_about = "Export the charts view as a one-page PDF report.

The three charts are rasterized into a single bitmap and embedded as
the sole content of an A4 portrait page, scaled to the full page
width.")]
    /// Export the charts view as a one-page A4 PDF
    Export {
        /// Path to spreadsheet file (.xlsx, .xls, .csv)
        file: PathBuf,

        /// Output PDF path (default: dashboard-report.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> SightResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, query } => cli::inspect(file, query),

        Commands::Analyze {
            file,
            mock,
            endpoint,
        } => cli::analyze(file, mock, endpoint).await,

        Commands::Charts { file, output } => cli::charts(file, output),

        Commands::Export { file, output } => cli::export(file, output),
    }
}
