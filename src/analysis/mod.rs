//! Analysis requester: sends the dataset to a remote AI endpoint, or serves
//! a canned summary in mock mode.
//!
//! Remote is the canonical contract; mock is a demo/fallback configuration
//! of the same client. Either way the session's in-flight flag goes up
//! synchronously when a request starts and is cleared when the latest
//! request concludes, success or failure.

pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SightError, SightResult};
use crate::store::DashboardSession;
use crate::types::{AnalysisSummary, Dataset};

/// The analysis function endpoint the dashboard ships with.
pub const DEFAULT_ENDPOINT: &str =
    "https://functions.poehali.dev/6a0bf242-3aa7-4c36-afdb-b25d9712b461";

/// Fixed latency of the mock variant.
pub const MOCK_DELAY: Duration = Duration::from_millis(2000);

/// Deployment configuration of the requester.
#[derive(Debug, Clone)]
pub enum AnalysisMode {
    /// POST the dataset to an analysis endpoint and decode the response.
    Remote { endpoint: String },
    /// Ignore the dataset and return a canned summary after a fixed delay.
    Mock,
}

/// Request body for the remote endpoint: `{"excelData": {headers, rows}}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    excel_data: &'a Dataset,
}

#[derive(Clone)]
pub struct AnalysisClient {
    mode: AnalysisMode,
    http: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            http: reqwest::Client::new(),
        }
    }

    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self::new(AnalysisMode::Remote {
            endpoint: endpoint.into(),
        })
    }

    pub fn mock() -> Self {
        Self::new(AnalysisMode::Mock)
    }

    pub fn mode(&self) -> &AnalysisMode {
        &self.mode
    }

    /// Run one analysis over the dataset.
    pub async fn analyze(&self, dataset: &Dataset) -> SightResult<AnalysisSummary> {
        match &self.mode {
            AnalysisMode::Remote { endpoint } => self.analyze_remote(endpoint, dataset).await,
            AnalysisMode::Mock => {
                tokio::time::sleep(MOCK_DELAY).await;
                Ok(mock::sample_analysis())
            }
        }
    }

    async fn analyze_remote(
        &self,
        endpoint: &str,
        dataset: &Dataset,
    ) -> SightResult<AnalysisSummary> {
        let response = self
            .http
            .post(endpoint)
            .json(&AnalysisRequest {
                excel_data: dataset,
            })
            .send()
            .await
            .map_err(|e| SightError::Analysis(format!("request to {endpoint} failed: {e}")))?;

        // non-2xx is a failure, same as any transport error
        let response = response
            .error_for_status()
            .map_err(|e| SightError::Analysis(format!("analysis endpoint rejected request: {e}")))?;

        response
            .json::<AnalysisSummary>()
            .await
            .map_err(|e| SightError::Analysis(format!("malformed analysis response: {e}")))
    }
}

/// Orchestrate one analysis round against the session.
///
/// Snapshots the dataset, raises the in-flight flag, awaits the client, and
/// applies the result under the request token so a stale response can never
/// clobber a newer one. Failures are logged and swallowed: the previous
/// summary (or none) stays on screen. Returns whether a summary was applied.
pub async fn run_analysis(
    session: &Arc<RwLock<DashboardSession>>,
    client: &AnalysisClient,
) -> bool {
    let (dataset, token) = {
        let mut guard = session.write();
        let Some(dataset) = guard.dataset().cloned() else {
            debug!("analysis requested with no dataset loaded");
            return false;
        };
        (dataset, guard.begin_analysis())
    };

    match client.analyze(&dataset).await {
        Ok(summary) => {
            let applied = session.write().apply_analysis(token, summary);
            if !applied {
                debug!("discarding stale analysis response");
            }
            applied
        }
        Err(e) => {
            warn!("analysis failed: {e}");
            session.write().fail_analysis(token);
            false
        }
    }
}
