//! Synthetic chart models derived from the dataset.
//!
//! Bar heights and pie stroke lengths are plain proportions of the series
//! maximum; there is no layout engine and no forecasting model. The
//! forecast series is the trailing real data concatenated with fixed
//! future placeholder points.

use serde::Serialize;

use crate::render::table::{ColumnKind, ColumnSchema};
use crate::types::{Cell, Dataset};

/// Hard-coded future points appended to the forecast series.
pub const FORECAST_POINTS: [(&str, f64); 3] = [
    ("Янв 2025", 980_000.0),
    ("Фев 2025", 1_050_000.0),
    ("Мар 2025", 1_120_000.0),
];

/// How many trailing real rows the forecast series keeps.
pub const FORECAST_TRAILING_ROWS: usize = 3;

/// Donut stroke circumference the dash lengths are scaled against.
pub const PIE_CIRCUMFERENCE: f64 = 251.2;

/// Fixed expense structure; the pie is synthetic, not data-driven.
pub const EXPENSE_SHARES: [(&str, f64); 3] = [
    ("Операционные", 30.0),
    ("Маркетинг", 25.0),
    ("Зарплата", 45.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Height as a percentage of the series maximum.
    pub height_pct: f64,
    /// True for the appended future placeholder points.
    pub forecast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    pub label: String,
    pub share_pct: f64,
    /// Stroke dash length on the [`PIE_CIRCUMFERENCE`] circle.
    pub dash_length: f64,
    /// Negative running offset of the preceding segments.
    pub dash_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub revenue_trend: Vec<Bar>,
    pub expense_breakdown: Vec<PieSegment>,
    pub forecast: Vec<Bar>,
}

/// Build all three chart models from the dataset.
pub fn build_charts(dataset: &Dataset) -> ChartModel {
    let points = series_points(dataset);

    let revenue_trend = scale_bars(
        points
            .iter()
            .map(|(label, value)| (label.clone(), *value, false))
            .collect(),
    );

    let trailing = points
        .iter()
        .rev()
        .take(FORECAST_TRAILING_ROWS)
        .rev()
        .map(|(label, value)| (label.clone(), *value, false));
    let future = FORECAST_POINTS
        .iter()
        .map(|(label, value)| ((*label).to_string(), *value, true));
    let forecast = scale_bars(trailing.chain(future).collect());

    ChartModel {
        revenue_trend,
        expense_breakdown: expense_breakdown(),
        forecast,
    }
}

/// The fixed three-segment donut with proportional dash geometry.
pub fn expense_breakdown() -> Vec<PieSegment> {
    let mut offset = 0.0;
    EXPENSE_SHARES
        .iter()
        .map(|(label, share)| {
            let dash_length = share / 100.0 * PIE_CIRCUMFERENCE;
            let segment = PieSegment {
                label: (*label).to_string(),
                share_pct: *share,
                dash_length,
                dash_offset: -offset,
            };
            offset += dash_length;
            segment
        })
        .collect()
}

/// Extract the (label, value) series: values from the first currency
/// column, labels from the first label column. Datasets without a currency
/// header fall back to the second column, mirroring sheets laid out as
/// period/revenue/....
fn series_points(dataset: &Dataset) -> Vec<(String, f64)> {
    let schema = ColumnSchema::bind(&dataset.headers);
    let value_col = schema
        .kinds()
        .iter()
        .position(|k| *k == ColumnKind::Currency)
        .unwrap_or_else(|| usize::from(dataset.column_count() > 1));
    let label_col = schema
        .kinds()
        .iter()
        .position(|k| *k == ColumnKind::Label)
        .unwrap_or(0);

    dataset
        .rows
        .iter()
        .map(|row| {
            let label = row.get(label_col).map(Cell::as_text).unwrap_or_default();
            let value = row.get(value_col).and_then(Cell::as_number).unwrap_or(0.0);
            (label, value)
        })
        .collect()
}

fn scale_bars(points: Vec<(String, f64, bool)>) -> Vec<Bar> {
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    points
        .into_iter()
        .map(|(label, value, forecast)| Bar {
            height_pct: if max > 0.0 { value / max * 100.0 } else { 0.0 },
            label,
            value,
            forecast,
        })
        .collect()
}
