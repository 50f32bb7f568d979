//! Sheetsight API server implementation
//!
//! HTTP REST API server using Axum. Provides endpoints to load a
//! spreadsheet, browse the filtered table, run AI analysis, read chart
//! models, and export the PDF report.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use parking_lot::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::{AnalysisClient, AnalysisMode, DEFAULT_ENDPOINT};
use crate::store::DashboardSession;

use super::handlers;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub analysis: AnalysisMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            analysis: AnalysisMode::Remote {
                endpoint: DEFAULT_ENDPOINT.to_string(),
            },
        }
    }
}

/// Shared application state: one dashboard session behind a lock plus the
/// configured analysis client.
pub struct AppState {
    pub version: String,
    pub session: Arc<RwLock<DashboardSession>>,
    pub client: AnalysisClient,
}

impl AppState {
    pub fn new(client: AnalysisClient) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            session: Arc::new(RwLock::new(DashboardSession::new())),
            client,
        }
    }
}

/// Build the router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Dashboard endpoints
        .route("/api/v1/load", post(handlers::load))
        .route("/api/v1/table", get(handlers::table))
        .route("/api/v1/analyze", post(handlers::analyze))
        .route("/api/v1/analysis", get(handlers::analysis))
        .route("/api/v1/charts", get(handlers::charts))
        .route("/api/v1/export", post(handlers::export))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetsight=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new(AnalysisClient::new(config.analysis.clone())));
    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 Sheetsight API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/load, /api/v1/table, /api/v1/analyze, /api/v1/analysis, /api/v1/charts, /api/v1/export");
    info!("   Health: /health, Version: /version");
    match &config.analysis {
        AnalysisMode::Remote { endpoint } => info!("   Analysis: remote ({})", endpoint),
        AnalysisMode::Mock => info!("   Analysis: mock"),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Sheetsight API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(matches!(config.analysis, AnalysisMode::Remote { .. }));
    }

    #[test]
    fn test_config_custom_values() {
        let config = ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            analysis: AnalysisMode::Mock,
        };
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            analysis: AnalysisMode::Mock,
        };
        let addr_str = format!("{}:{}", config.host, config.port);
        assert_eq!(addr_str, "192.168.1.100:9090");

        // Verify it parses to SocketAddr
        let addr: SocketAddr = addr_str.parse().unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_starts_empty() {
        let state = AppState::new(AnalysisClient::mock());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.session.read().dataset().is_none());
        assert!(!state.session.read().is_analyzing());
    }

    #[test]
    fn test_app_state_in_arc() {
        let state = Arc::new(AppState::new(AnalysisClient::mock()));
        let state_clone = Arc::clone(&state);
        assert_eq!(state.version, state_clone.version);
        assert_eq!(Arc::strong_count(&state), 2);
    }
}
