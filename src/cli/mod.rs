//! CLI command handlers

pub mod commands;

pub use commands::{analyze, charts, export, inspect};
