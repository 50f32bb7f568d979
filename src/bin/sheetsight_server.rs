//! Sheetsight API Server binary
//!
//! HTTP REST API for the spreadsheet dashboard.
//! Provides load, table, analyze, analysis, charts, export endpoints.

use clap::Parser;
use sheetsight::analysis::{AnalysisMode, DEFAULT_ENDPOINT};
use sheetsight::api::{run_api_server, server::ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "sheetsight-server")]
#[command(version)]
#[command(about = "Sheetsight API Server - HTTP REST API for the spreadsheet dashboard")]
#[command(long_about = r#"
Sheetsight API Server - HTTP REST API

Provides RESTful endpoints for the dashboard session:
  - POST /api/v1/load     - Load a spreadsheet file (.xlsx/.xls/.csv)
  - GET  /api/v1/table    - Formatted table view, filtered by ?query=
  - POST /api/v1/analyze  - Start an AI analysis in the background
  - GET  /api/v1/analysis - Analysis view (loading/empty/ready)
  - GET  /api/v1/charts   - Chart models derived from the dataset
  - POST /api/v1/export   - Export the charts view as a one-page PDF

Additional endpoints:
  - GET  /health          - Health check
  - GET  /version         - Server version info
  - GET  /                - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging

Example usage:
  sheetsight-server                           # Start on localhost:8080
  sheetsight-server --host 0.0.0.0 --port 3000
  sheetsight-server --mock                    # Canned analysis, no network

  curl -X POST http://localhost:8080/api/v1/load \
    -H "Content-Type: application/json" \
    -d '{"file_path": "report.xlsx"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETSIGHT_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEETSIGHT_PORT")]
    port: u16,

    /// Serve canned analysis results instead of calling the remote endpoint
    #[arg(long, env = "SHEETSIGHT_MOCK")]
    mock: bool,

    /// Analysis endpoint URL (ignored with --mock)
    #[arg(long, env = "SHEETSIGHT_ENDPOINT")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let analysis = if args.mock {
        AnalysisMode::Mock
    } else {
        AnalysisMode::Remote {
            endpoint: args
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    };

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        analysis,
    };

    run_api_server(config).await
}
