//! Presentation views: read-only render models derived from session state.
//!
//! Each view is selected through a single function returning an explicit
//! three-state union, so call sites dispatch on one tag instead of juggling
//! boolean flags.

pub mod charts;
pub mod raster;
pub mod table;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::DashboardSession;
use crate::types::AnalysisSummary;

pub use charts::{build_charts, Bar, ChartModel, PieSegment};
pub use table::{render_table, ColumnKind, ColumnSchema, RenderedCell, TableView};

/// The three mutually exclusive states every dashboard view renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    /// Work is in flight; show a progress indicator.
    Loading,
    /// Nothing to show yet; show a call to action.
    Empty,
    /// Content is available.
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }
}

/// The populated analysis view: the summary plus when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub summary: AnalysisSummary,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Select the analysis view state: in-flight wins over everything, then an
/// absent summary, then the populated report.
pub fn analysis_view(session: &DashboardSession) -> ViewState<AnalysisReport> {
    if session.is_analyzing() {
        return ViewState::Loading;
    }
    match session.analysis() {
        None => ViewState::Empty,
        Some(summary) => ViewState::Ready(AnalysisReport {
            summary: summary.clone(),
            analyzed_at: session.analyzed_at(),
        }),
    }
}

/// Select the table view: empty until a dataset is loaded, then the
/// formatted table filtered by the session query.
pub fn table_view(session: &DashboardSession) -> ViewState<TableView> {
    match session.dataset() {
        None => ViewState::Empty,
        Some(dataset) => ViewState::Ready(render_table(dataset, session.query())),
    }
}

/// Select the charts view: empty until a dataset is loaded.
pub fn charts_view(session: &DashboardSession) -> ViewState<ChartModel> {
    match session.dataset() {
        None => ViewState::Empty,
        Some(dataset) => ViewState::Ready(build_charts(dataset)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Dataset};

    fn session_with_dataset() -> DashboardSession {
        let mut session = DashboardSession::new();
        session.load_dataset(Dataset::new(
            vec!["Период".to_string(), "Доход".to_string()],
            vec![vec![Cell::text("Янв 2024"), Cell::number(450000.0)]],
        ));
        session
    }

    #[test]
    fn test_view_state_serde_tags() {
        let empty: ViewState<AnalysisReport> = ViewState::Empty;
        let json = serde_json::to_string(&empty).unwrap();
        assert_eq!(json, r#"{"state":"empty"}"#);

        let loading: ViewState<AnalysisReport> = ViewState::Loading;
        assert_eq!(
            serde_json::to_string(&loading).unwrap(),
            r#"{"state":"loading"}"#
        );
    }

    #[test]
    fn test_analysis_view_states() {
        let mut session = session_with_dataset();
        assert_eq!(analysis_view(&session), ViewState::Empty);

        let token = session.begin_analysis();
        assert_eq!(analysis_view(&session), ViewState::Loading);

        session.apply_analysis(token, crate::analysis::mock::sample_analysis());
        assert!(analysis_view(&session).is_ready());
    }

    #[test]
    fn test_table_and_charts_views_need_a_dataset() {
        let empty = DashboardSession::new();
        assert_eq!(table_view(&empty), ViewState::Empty);
        assert_eq!(charts_view(&empty), ViewState::Empty);

        let session = session_with_dataset();
        assert!(table_view(&session).is_ready());
        assert!(charts_view(&session).is_ready());
    }

    #[test]
    fn test_loading_analysis_hides_previous_summary() {
        let mut session = session_with_dataset();
        let token = session.begin_analysis();
        session.apply_analysis(token, crate::analysis::mock::sample_analysis());

        session.begin_analysis();
        // a new in-flight request shows the progress state even though the
        // old summary is still stored
        assert_eq!(analysis_view(&session), ViewState::Loading);
    }
}
