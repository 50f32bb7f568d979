//! Session state: the loaded dataset, the search query, and analysis results.
//!
//! `filter_rows` is the only derived-state computation: filtered rows are
//! recomputed from the dataset and query on demand, never stored.

use chrono::{DateTime, Utc};

use crate::types::{AnalysisSummary, Cell, Dataset};

/// Keep the rows where at least one cell's textual form contains `query`
/// case-insensitively. Literal substring match, not anchored, not a regex.
/// The original row order is preserved; an empty query keeps every row.
pub fn filter_rows(dataset: &Dataset, query: &str) -> Vec<Vec<Cell>> {
    if query.is_empty() {
        return dataset.rows.clone();
    }
    let needle = query.to_lowercase();
    dataset
        .rows
        .iter()
        .filter(|row| {
            row.iter()
                .any(|cell| cell.as_text().to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Correlates an analysis request with its response. Responses carrying a
/// token older than the session's current generation are discarded, so a
/// slow response for a since-replaced request can never overwrite a newer
/// summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisToken(u64);

/// One dashboard session: dataset, search query, analysis state.
///
/// All state is process-local and vanishes with the session.
#[derive(Debug, Default)]
pub struct DashboardSession {
    dataset: Option<Dataset>,
    query: String,
    analysis: Option<AnalysisSummary>,
    analyzed_at: Option<DateTime<Utc>>,
    analyzing: bool,
    generation: u64,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset wholesale. Filtered rows follow implicitly since
    /// they are derived; a previously computed analysis summary stays
    /// visible until the next analysis run replaces it.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The filtered row subset for the current query.
    pub fn filtered_rows(&self) -> Vec<Vec<Cell>> {
        match &self.dataset {
            Some(dataset) => filter_rows(dataset, &self.query),
            None => Vec::new(),
        }
    }

    /// Start an analysis request: the in-flight flag goes up synchronously
    /// and the generation advances, invalidating any older request still
    /// running.
    pub fn begin_analysis(&mut self) -> AnalysisToken {
        self.generation += 1;
        self.analyzing = true;
        AnalysisToken(self.generation)
    }

    /// Apply a completed analysis. Returns false (and changes nothing) when
    /// the token is stale; the latest request always clears the in-flight
    /// flag.
    pub fn apply_analysis(&mut self, token: AnalysisToken, summary: AnalysisSummary) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.analysis = Some(summary);
        self.analyzed_at = Some(Utc::now());
        self.analyzing = false;
        true
    }

    /// Record a failed analysis: clears the in-flight flag for the latest
    /// request and leaves the previous summary (if any) in place.
    pub fn fail_analysis(&mut self, token: AnalysisToken) -> bool {
        if token.0 != self.generation {
            return false;
        }
        self.analyzing = false;
        true
    }

    pub fn analysis(&self) -> Option<&AnalysisSummary> {
        self.analysis.as_ref()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec![
                "Период".to_string(),
                "Доход".to_string(),
                "Рост %".to_string(),
            ],
            vec![
                vec![
                    Cell::text("Янв 2024"),
                    Cell::number(450000.0),
                    Cell::number(12.5),
                ],
                vec![
                    Cell::text("Фев 2024"),
                    Cell::number(520000.0),
                    Cell::number(15.6),
                ],
                vec![
                    Cell::text("Мар 2024"),
                    Cell::number(480000.0),
                    Cell::number(-7.7),
                ],
            ],
        )
    }

    fn sample_summary() -> AnalysisSummary {
        AnalysisSummary {
            total_revenue: 1450000.0,
            avg_revenue: 483333.0,
            growth: 6.7,
            forecast: 500000.0,
            insights: vec!["i".to_string()],
            recommendations: vec!["r".to_string()],
        }
    }

    #[test]
    fn test_empty_query_keeps_all_rows_in_order() {
        let dataset = sample_dataset();
        assert_eq!(filter_rows(&dataset, ""), dataset.rows);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let dataset = sample_dataset();
        let rows = filter_rows(&dataset, "янв");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Cell::text("Янв 2024"));
    }

    #[test]
    fn test_filter_matches_numeric_text_form() {
        let dataset = sample_dataset();
        // 450000 renders as "450000", so "4500" is a substring
        let rows = filter_rows(&dataset, "4500");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], Cell::number(450000.0));
        // decimal point included in the default rendering
        assert_eq!(filter_rows(&dataset, "12.5").len(), 1);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = sample_dataset();
        let once = filter_rows(&dataset, "2024");
        let again = filter_rows(&Dataset::new(dataset.headers.clone(), once.clone()), "2024");
        assert_eq!(once, again);
    }

    #[test]
    fn test_filter_zero_rows() {
        let dataset = Dataset::new(vec!["a".to_string()], Vec::new());
        assert!(filter_rows(&dataset, "x").is_empty());
        assert!(filter_rows(&dataset, "").is_empty());
    }

    #[test]
    fn test_filter_no_match() {
        let dataset = sample_dataset();
        assert!(filter_rows(&dataset, "nothing-here").is_empty());
    }

    #[test]
    fn test_load_dataset_keeps_previous_analysis() {
        let mut session = DashboardSession::new();
        session.load_dataset(sample_dataset());
        let token = session.begin_analysis();
        assert!(session.apply_analysis(token, sample_summary()));

        session.load_dataset(sample_dataset());
        assert!(session.analysis().is_some());
    }

    #[test]
    fn test_begin_analysis_sets_in_flight() {
        let mut session = DashboardSession::new();
        assert!(!session.is_analyzing());
        let _token = session.begin_analysis();
        assert!(session.is_analyzing());
    }

    #[test]
    fn test_stale_token_is_discarded() {
        let mut session = DashboardSession::new();
        let first = session.begin_analysis();
        let second = session.begin_analysis();

        // first response arrives late: discarded, flag untouched
        assert!(!session.apply_analysis(first, sample_summary()));
        assert!(session.analysis().is_none());
        assert!(session.is_analyzing());

        // latest response lands and clears the flag
        assert!(session.apply_analysis(second, sample_summary()));
        assert!(!session.is_analyzing());
        assert!(session.analysis().is_some());
    }

    #[test]
    fn test_failure_clears_flag_and_keeps_old_summary() {
        let mut session = DashboardSession::new();
        let token = session.begin_analysis();
        assert!(session.apply_analysis(token, sample_summary()));

        let token = session.begin_analysis();
        assert!(session.is_analyzing());
        assert!(session.fail_analysis(token));
        assert!(!session.is_analyzing());
        assert_eq!(session.analysis(), Some(&sample_summary()));
    }

    #[test]
    fn test_stale_failure_does_not_clear_newer_flag() {
        let mut session = DashboardSession::new();
        let first = session.begin_analysis();
        let _second = session.begin_analysis();
        assert!(!session.fail_analysis(first));
        assert!(session.is_analyzing());
    }

    #[test]
    fn test_filtered_rows_without_dataset() {
        let session = DashboardSession::new();
        assert!(session.filtered_rows().is_empty());
    }
}
