//! HTTP API for the dashboard
//!
//! Axum-based REST surface over one dashboard session: load, table,
//! analyze, analysis, charts, export.

pub mod handlers;
pub mod server;

pub use server::run_api_server;
