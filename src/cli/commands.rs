use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;

use crate::analysis::{AnalysisClient, DEFAULT_ENDPOINT};
use crate::error::SightResult;
use crate::export::{export_report, ReportRegion, DEFAULT_EXPORT_FILENAME};
use crate::ingest::SpreadsheetImporter;
use crate::render::charts::build_charts;
use crate::render::raster::{render_chart_png, ChartPane};
use crate::render::table::{format_currency, format_percent, render_table, RenderedCell};
use crate::types::Dataset;

fn load_dataset(file: &PathBuf) -> SightResult<Dataset> {
    SpreadsheetImporter::new(file).import()
}

/// Execute the inspect command: print the formatted, filtered table.
pub fn inspect(file: PathBuf, query: Option<String>) -> SightResult<()> {
    println!("{}", "📊 Sheetsight - Data table".bold().green());
    println!("   File: {}", file.display());
    let query = query.unwrap_or_default();
    if !query.is_empty() {
        println!("   Query: {}", query.bright_yellow());
    }
    println!();

    let dataset = load_dataset(&file)?;
    if dataset.is_empty() {
        println!("{}", "   (empty sheet)".yellow());
        return Ok(());
    }

    let view = render_table(&dataset, &query);

    // column widths from headers and visible cells
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
    for row in &view.rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.text().chars().count());
            }
        }
    }

    let header_line = view
        .headers
        .iter()
        .enumerate()
        .map(|(idx, h)| pad(h, widths[idx]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("   {}", header_line.bold());

    for row in &view.rows {
        let mut line = String::from("   ");
        for (idx, cell) in row.iter().enumerate() {
            let padded = pad(cell.text(), widths[idx]);
            let rendered = match cell {
                RenderedCell::Badge { positive: true, .. } => padded.green().to_string(),
                RenderedCell::Badge { positive: false, .. } => padded.red().to_string(),
                RenderedCell::Money { .. } => padded.cyan().to_string(),
                RenderedCell::Plain { .. } => padded,
            };
            line.push_str(&rendered);
            line.push_str("  ");
        }
        println!("{}", line.trim_end());
    }

    println!();
    println!("   {} of {} rows shown", view.rows.len(), view.total_rows);
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = String::from(text);
    for _ in len..width {
        out.push(' ');
    }
    out
}

/// Execute the analyze command: run one analysis and print the summary.
pub async fn analyze(file: PathBuf, mock: bool, endpoint: Option<String>) -> SightResult<()> {
    println!("{}", "📊 Sheetsight - AI analysis".bold().green());
    println!("   File: {}", file.display());

    let dataset = load_dataset(&file)?;
    let client = if mock {
        println!("   Mode: {}", "mock".bright_yellow());
        AnalysisClient::mock()
    } else {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        println!("   Endpoint: {}", endpoint);
        AnalysisClient::remote(endpoint)
    };
    println!();

    println!("{}", "🤖 Analyzing...".cyan());
    let summary = client.analyze(&dataset).await?;

    println!("{}", "✅ Analysis results:".bold().green());
    println!(
        "   Total revenue:   {}",
        format_currency(summary.total_revenue).bold()
    );
    println!(
        "   Average revenue: {}",
        format_currency(summary.avg_revenue).bold()
    );
    println!(
        "   Growth:          {}",
        format_percent(summary.growth).bold()
    );
    println!(
        "   Forecast:        {}",
        format_currency(summary.forecast).bold()
    );

    if !summary.insights.is_empty() {
        println!("\n   {}", "Insights:".bright_blue().bold());
        for insight in &summary.insights {
            println!("   • {}", insight);
        }
    }
    if !summary.recommendations.is_empty() {
        println!("\n   {}", "Recommendations:".bright_blue().bold());
        for recommendation in &summary.recommendations {
            println!("   • {}", recommendation);
        }
    }

    println!("\n   Generated at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}

/// Execute the charts command: write the three chart panes as PNG files.
pub fn charts(file: PathBuf, output: PathBuf) -> SightResult<()> {
    println!("{}", "📊 Sheetsight - Charts".bold().green());
    println!("   File: {}", file.display());
    println!("   Output: {}", output.display());
    println!();

    let dataset = load_dataset(&file)?;
    let model = build_charts(&dataset);
    fs::create_dir_all(&output)?;

    for pane in [ChartPane::Revenue, ChartPane::Expenses, ChartPane::Forecast] {
        let path = output.join(pane.file_name());
        render_chart_png(&path, pane, &model)?;
        println!("   ✅ {}", path.display());
    }

    Ok(())
}

/// Execute the export command: write the one-page PDF report.
pub fn export(file: PathBuf, output: Option<PathBuf>) -> SightResult<()> {
    println!("{}", "📊 Sheetsight - PDF export".bold().green());
    println!("   File: {}", file.display());

    let dataset = load_dataset(&file)?;
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILENAME));

    match export_report(Some(&dataset), ReportRegion::Charts, &output)? {
        Some(path) => println!("   ✅ Report written to {}", path.display()),
        None => println!("{}", "   Nothing to export".yellow()),
    }
    Ok(())
}
