//! Sheetsight - financial spreadsheet dashboard
//!
//! This library turns an uploaded spreadsheet (.xlsx/.xls/.csv) into a
//! searchable table, an AI-generated financial analysis, synthetic
//! bar/pie chart models, and a one-page PDF report.
//!
//! # Features
//!
//! - First-sheet ingestion via calamine/csv into a rectangular dataset
//! - Case-insensitive substring filtering, derived on demand
//! - Remote (HTTP) or mock analysis with stale-response protection
//! - Header-bound column formatting (currency, percent, label)
//! - Chart rasterization (plotters) and A4 PDF export (printpdf)
//!
//! # Example
//!
//! ```no_run
//! use sheetsight::ingest::SpreadsheetImporter;
//! use sheetsight::store::filter_rows;
//!
//! let dataset = SpreadsheetImporter::new("report.xlsx").import()?;
//! println!("Rows: {}", dataset.row_count());
//!
//! let visible = filter_rows(&dataset, "2024");
//! println!("Matching rows: {}", visible.len());
//! # Ok::<(), sheetsight::error::SightError>(())
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod error;
pub mod export;
pub mod ingest;
pub mod render;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{SightError, SightResult};
pub use store::{filter_rows, DashboardSession};
pub use types::{AnalysisSummary, Cell, Dataset};
