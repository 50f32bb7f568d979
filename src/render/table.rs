//! Formatted table view: headers, a column schema, and rendered cells.
//!
//! Formatting is bound to header semantics, not column positions: a header
//! names a currency, a percentage, or a plain label, and every cell in that
//! column renders accordingly. Reordering columns keeps their formatting.

use serde::Serialize;

use crate::store::filter_rows;
use crate::types::{Cell, Dataset};

/// Header names (lowercased substrings) treated as money columns.
const CURRENCY_KEYWORDS: &[&str] = &[
    "доход",
    "расход",
    "прибыль",
    "выручка",
    "revenue",
    "income",
    "expense",
    "profit",
    "cost",
];

/// Semantic type of a column, bound from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Label,
    Currency,
    Percent,
}

impl ColumnKind {
    pub fn for_header(header: &str) -> Self {
        let name = header.to_lowercase();
        if name.contains('%') || name.contains("percent") {
            ColumnKind::Percent
        } else if CURRENCY_KEYWORDS.iter().any(|k| name.contains(k)) {
            ColumnKind::Currency
        } else {
            ColumnKind::Label
        }
    }
}

/// The per-column formatting schema for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    kinds: Vec<ColumnKind>,
}

impl ColumnSchema {
    /// Bind one semantic kind to every header.
    pub fn bind(headers: &[String]) -> Self {
        Self {
            kinds: headers.iter().map(|h| ColumnKind::for_header(h)).collect(),
        }
    }

    pub fn kind(&self, column: usize) -> ColumnKind {
        self.kinds.get(column).copied().unwrap_or(ColumnKind::Label)
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }
}

/// One formatted cell, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedCell {
    Plain { text: String },
    Money { text: String },
    Badge { text: String, positive: bool },
}

impl RenderedCell {
    pub fn text(&self) -> &str {
        match self {
            RenderedCell::Plain { text }
            | RenderedCell::Money { text }
            | RenderedCell::Badge { text, .. } => text,
        }
    }
}

/// The table view: column titles, the schema, and the filtered body rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub schema: ColumnSchema,
    /// Total rows in the dataset, before filtering.
    pub total_rows: usize,
    pub rows: Vec<Vec<RenderedCell>>,
}

/// Render the dataset filtered by `query` into formatted cells.
pub fn render_table(dataset: &Dataset, query: &str) -> TableView {
    let schema = ColumnSchema::bind(&dataset.headers);
    let rows = filter_rows(dataset, query)
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| render_cell(cell, schema.kind(idx)))
                .collect()
        })
        .collect();

    TableView {
        headers: dataset.headers.clone(),
        total_rows: dataset.row_count(),
        schema,
        rows,
    }
}

/// Format one cell under its column kind. Non-numeric cells in formatted
/// columns fall back to plain text.
pub fn render_cell(cell: &Cell, kind: ColumnKind) -> RenderedCell {
    match (kind, cell.as_number()) {
        (ColumnKind::Currency, Some(n)) => RenderedCell::Money {
            text: format_currency(n),
        },
        (ColumnKind::Percent, Some(n)) => RenderedCell::Badge {
            text: format_percent(n),
            positive: n >= 0.0,
        },
        _ => RenderedCell::Plain {
            text: cell.as_text(),
        },
    }
}

/// ru-RU money rendering: non-breaking-space digit groups, comma decimal
/// separator, ruble suffix. `450000` → `450 000 ₽`.
pub fn format_currency(value: f64) -> String {
    format!("{} ₽", group_ru(value))
}

/// Signed percentage: `12.5` → `+12.5%`, `-3.2` → `-3.2%`.
pub fn format_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value}%")
}

fn group_ru(value: f64) -> String {
    let negative = value < 0.0;
    // round to kopecks first so the fraction never carries
    let abs = (value.abs() * 100.0).round() / 100.0;
    let integer = abs.trunc() as i64;
    let cents = ((abs - integer as f64) * 100.0).round() as u32;

    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if cents > 0 {
        out.push(',');
        if cents % 10 == 0 {
            out.push_str(&(cents / 10).to_string());
        } else {
            out.push_str(&format!("{cents:02}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(450000.0), "450\u{a0}000 ₽");
        assert_eq!(format_currency(1120000.0), "1\u{a0}120\u{a0}000 ₽");
        assert_eq!(format_currency(999.0), "999 ₽");
        assert_eq!(format_currency(0.0), "0 ₽");
    }

    #[test]
    fn test_format_currency_fraction_and_sign() {
        assert_eq!(format_currency(12.5), "12,5 ₽");
        assert_eq!(format_currency(12.55), "12,55 ₽");
        assert_eq!(format_currency(-280000.0), "-280\u{a0}000 ₽");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.5), "+12.5%");
        assert_eq!(format_percent(0.0), "+0%");
        assert_eq!(format_percent(-7.7), "-7.7%");
    }

    #[test]
    fn test_column_kind_binding() {
        assert_eq!(ColumnKind::for_header("Рост %"), ColumnKind::Percent);
        assert_eq!(ColumnKind::for_header("Growth percent"), ColumnKind::Percent);
        assert_eq!(ColumnKind::for_header("Доход"), ColumnKind::Currency);
        assert_eq!(ColumnKind::for_header("Расход"), ColumnKind::Currency);
        assert_eq!(ColumnKind::for_header("Прибыль"), ColumnKind::Currency);
        assert_eq!(ColumnKind::for_header("Revenue"), ColumnKind::Currency);
        assert_eq!(ColumnKind::for_header("Период"), ColumnKind::Label);
        assert_eq!(ColumnKind::for_header("Comment"), ColumnKind::Label);
    }

    #[test]
    fn test_render_cell_fallbacks() {
        // text in a money column stays plain
        assert_eq!(
            render_cell(&Cell::text("n/a"), ColumnKind::Currency),
            RenderedCell::Plain {
                text: "n/a".to_string()
            }
        );
        // numbers in a label column render with their default form
        assert_eq!(
            render_cell(&Cell::number(42.0), ColumnKind::Label),
            RenderedCell::Plain {
                text: "42".to_string()
            }
        );
    }

    #[test]
    fn test_badge_sign() {
        assert_eq!(
            render_cell(&Cell::number(12.5), ColumnKind::Percent),
            RenderedCell::Badge {
                text: "+12.5%".to_string(),
                positive: true
            }
        );
        assert_eq!(
            render_cell(&Cell::number(-7.7), ColumnKind::Percent),
            RenderedCell::Badge {
                text: "-7.7%".to_string(),
                positive: false
            }
        );
    }
}
