//! Core data model: datasets parsed from spreadsheets and analysis summaries.

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell, either free text or a number.
///
/// Serialized untagged, so a row crosses the wire as `(string|number)[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        Cell::Number(value)
    }

    /// Parse a raw string into a cell, recognizing finite decimal numbers.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(number) = trimmed.parse::<f64>() {
                if number.is_finite() {
                    return Cell::Number(number);
                }
            }
        }
        Cell::Text(raw.to_string())
    }

    /// The cell's textual form: the default decimal rendering for numbers
    /// (no locale grouping), the string itself for text.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }
}

/// The parsed spreadsheet: a header row plus data rows.
///
/// Every row holds exactly `headers.len()` cells; the ingestor pads short
/// rows on load. A dataset is replaced wholesale on each upload, never
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Structured result of a financial analysis over a dataset.
///
/// Field names are camelCase on the wire; this is the exact shape the
/// analysis endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_revenue: f64,
    pub avg_revenue: f64,
    pub growth: f64,
    pub forecast: f64,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse_number() {
        assert_eq!(Cell::parse("450000"), Cell::Number(450000.0));
        assert_eq!(Cell::parse(" 12.5 "), Cell::Number(12.5));
        assert_eq!(Cell::parse("-3.2"), Cell::Number(-3.2));
    }

    #[test]
    fn test_cell_parse_text() {
        assert_eq!(Cell::parse("Янв 2024"), Cell::text("Янв 2024"));
        assert_eq!(Cell::parse(""), Cell::text(""));
        // non-finite parses are not numbers
        assert_eq!(Cell::parse("inf"), Cell::text("inf"));
        assert_eq!(Cell::parse("NaN"), Cell::text("NaN"));
    }

    #[test]
    fn test_cell_as_text_drops_trailing_zero() {
        assert_eq!(Cell::Number(450000.0).as_text(), "450000");
        assert_eq!(Cell::Number(12.5).as_text(), "12.5");
    }

    #[test]
    fn test_cell_serde_untagged() {
        let row: Vec<Cell> = serde_json::from_str(r#"["Янв 2024", 450000, 12.5]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Cell::text("Янв 2024"),
                Cell::Number(450000.0),
                Cell::Number(12.5)
            ]
        );

        let json = serde_json::to_string(&Cell::Number(12.5)).unwrap();
        assert_eq!(json, "12.5");
        let json = serde_json::to_string(&Cell::text("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_analysis_summary_camel_case_wire_shape() {
        let json = r#"{
            "totalRevenue": 8940000,
            "avgRevenue": 745000,
            "growth": 12.5,
            "forecast": 980000,
            "insights": ["a"],
            "recommendations": ["b"]
        }"#;
        let summary: AnalysisSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_revenue, 8940000.0);
        assert_eq!(summary.growth, 12.5);

        let out = serde_json::to_string(&summary).unwrap();
        assert!(out.contains("\"totalRevenue\""));
        assert!(out.contains("\"avgRevenue\""));
        assert!(!out.contains("total_revenue"));
    }

    #[test]
    fn test_dataset_counts() {
        let dataset = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::text("x"), Cell::number(1.0)]],
        );
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(dataset.column_count(), 2);
        assert!(!dataset.is_empty());
        assert!(Dataset::default().is_empty());
    }
}
