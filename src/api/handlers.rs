//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis;
use crate::export::{export_report, ReportRegion, DEFAULT_EXPORT_FILENAME};
use crate::ingest::SpreadsheetImporter;
use crate::render::{analysis_view, charts_view, table_view, AnalysisReport, ChartModel, ViewState};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Sheetsight API Server".to_string(),
        version: state.version.clone(),
        description: "Financial spreadsheet dashboard over HTTP".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/health".to_string(),
                method: "GET".to_string(),
                description: "Health check endpoint".to_string(),
            },
            EndpointInfo {
                path: "/version".to_string(),
                method: "GET".to_string(),
                description: "Get server version".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/load".to_string(),
                method: "POST".to_string(),
                description: "Load a spreadsheet file into the session".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/table".to_string(),
                method: "GET".to_string(),
                description: "Formatted table view, filtered by ?query=".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/analyze".to_string(),
                method: "POST".to_string(),
                description: "Start an AI analysis of the loaded dataset".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/analysis".to_string(),
                method: "GET".to_string(),
                description: "Current analysis view (loading/empty/ready)".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/charts".to_string(),
                method: "GET".to_string(),
                description: "Chart models derived from the dataset".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/export".to_string(),
                method: "POST".to_string(),
                description: "Export the charts view as a one-page PDF".to_string(),
            },
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "load".to_string(),
            "table".to_string(),
            "analyze".to_string(),
            "charts".to_string(),
            "export".to_string(),
        ],
    }))
}

/// Load request
#[derive(Deserialize)]
pub struct LoadRequest {
    pub file_path: String,
}

/// Load response
#[derive(Serialize, Default)]
pub struct LoadResponse {
    pub loaded: bool,
    pub file_path: String,
    pub rows: usize,
    pub columns: usize,
    pub message: String,
}

/// POST /api/v1/load - Load a spreadsheet into the session
pub async fn load(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadRequest>,
) -> impl IntoResponse {
    let path = PathBuf::from(&req.file_path);

    match SpreadsheetImporter::new(&path).import() {
        Ok(dataset) => {
            let (rows, columns) = (dataset.row_count(), dataset.column_count());
            state.session.write().load_dataset(dataset);
            Json(ApiResponse::ok(LoadResponse {
                loaded: true,
                file_path: req.file_path,
                rows,
                columns,
                message: "Dataset loaded".to_string(),
            }))
        }
        // the previously loaded dataset, if any, stays in place
        Err(e) => Json(ApiResponse::ok(LoadResponse {
            loaded: false,
            file_path: req.file_path,
            rows: 0,
            columns: 0,
            message: format!("Error: {}", e),
        })),
    }
}

/// Table query parameters
#[derive(Deserialize, Default)]
pub struct TableParams {
    pub query: Option<String>,
}

/// GET /api/v1/table - Formatted table view
pub async fn table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TableParams>,
) -> impl IntoResponse {
    let mut session = state.session.write();
    if let Some(query) = params.query {
        session.set_query(query);
    }
    Json(ApiResponse::ok(table_view(&session)))
}

/// Analyze response
#[derive(Serialize, Default)]
pub struct AnalyzeResponse {
    pub started: bool,
    pub message: String,
}

/// POST /api/v1/analyze - Start an analysis in the background
pub async fn analyze(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    {
        let session = state.session.read();
        if session.dataset().is_none() {
            return Json(ApiResponse::ok(AnalyzeResponse {
                started: false,
                message: "No dataset loaded".to_string(),
            }));
        }
        // advisory guard: mirrors the disabled button, does not lock anything
        if session.is_analyzing() {
            return Json(ApiResponse::ok(AnalyzeResponse {
                started: false,
                message: "Analysis already in flight".to_string(),
            }));
        }
    }

    let session = Arc::clone(&state.session);
    let client = state.client.clone();
    tokio::spawn(async move {
        analysis::run_analysis(&session, &client).await;
    });

    Json(ApiResponse::ok(AnalyzeResponse {
        started: true,
        message: "Analysis started".to_string(),
    }))
}

/// GET /api/v1/analysis - Current analysis view
pub async fn analysis(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view: ViewState<AnalysisReport> = analysis_view(&state.session.read());
    Json(ApiResponse::ok(view))
}

/// GET /api/v1/charts - Chart models
pub async fn charts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view: ViewState<ChartModel> = charts_view(&state.session.read());
    Json(ApiResponse::ok(view))
}

/// Export request
#[derive(Deserialize, Default)]
pub struct ExportRequest {
    pub output_path: Option<String>,
}

/// Export response
#[derive(Serialize, Default)]
pub struct ExportResponse {
    pub exported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

/// POST /api/v1/export - Export the charts view as a PDF report
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequest>,
) -> impl IntoResponse {
    let output = PathBuf::from(
        req.output_path
            .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string()),
    );

    let session = state.session.read();
    match export_report(session.dataset(), ReportRegion::Charts, &output) {
        Ok(Some(path)) => Json(ApiResponse::ok(ExportResponse {
            exported: true,
            path: Some(path.display().to_string()),
            message: "Report written".to_string(),
        })),
        Ok(None) => Json(ApiResponse::ok(ExportResponse {
            exported: false,
            path: None,
            message: "Nothing to export: no dataset loaded".to_string(),
        })),
        Err(e) => Json(ApiResponse::ok(ExportResponse {
            exported: false,
            path: None,
            message: format!("Error: {}", e),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        assert!(!response.request_id.is_empty());
        // Verify UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
        assert!(!response.request_id.is_empty());
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let response1: ApiResponse<String> = ApiResponse::ok("test1".to_string());
        let response2: ApiResponse<String> = ApiResponse::ok("test2".to_string());

        assert_ne!(response1.request_id, response2.request_id);
    }

    #[test]
    fn test_api_response_serializes_without_none_fields() {
        let response: ApiResponse<String> = ApiResponse::ok("data".to_string());
        let json = serde_json::to_string(&response).unwrap();

        // error field should be skipped when None
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"data\""));
    }

    #[test]
    fn test_load_response_default() {
        let response = LoadResponse::default();

        assert!(!response.loaded);
        assert_eq!(response.rows, 0);
        assert!(response.file_path.is_empty());
        assert!(response.message.is_empty());
    }

    #[test]
    fn test_analyze_response_default() {
        let response = AnalyzeResponse::default();

        assert!(!response.started);
        assert!(response.message.is_empty());
    }

    #[test]
    fn test_export_response_skips_absent_path() {
        let response = ExportResponse {
            exported: false,
            path: None,
            message: "skipped".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("\"path\""));
    }

    #[test]
    fn test_load_request_deserialize() {
        let json = r#"{"file_path": "report.xlsx"}"#;
        let req: LoadRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.file_path, "report.xlsx");
    }

    #[test]
    fn test_table_params_deserialize() {
        let params: TableParams = serde_json::from_str(r#"{"query": "2024"}"#).unwrap();
        assert_eq!(params.query.as_deref(), Some("2024"));

        let params: TableParams = serde_json::from_str("{}").unwrap();
        assert!(params.query.is_none());
    }

    #[test]
    fn test_export_request_deserialize() {
        let req: ExportRequest =
            serde_json::from_str(r#"{"output_path": "/tmp/report.pdf"}"#).unwrap();
        assert_eq!(req.output_path.as_deref(), Some("/tmp/report.pdf"));

        let req: ExportRequest = serde_json::from_str("{}").unwrap();
        assert!(req.output_path.is_none());
    }

    #[test]
    fn test_endpoint_info_serialize() {
        let info = EndpointInfo {
            path: "/api/v1/load".to_string(),
            method: "POST".to_string(),
            description: "Load a spreadsheet".to_string(),
        };
        let json = serde_json::to_string(&info).unwrap();

        assert!(json.contains("\"path\":\"/api/v1/load\""));
        assert!(json.contains("\"method\":\"POST\""));
    }
}
