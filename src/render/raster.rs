//! Chart rasterization with plotters: PNG files for the CLI and RGB
//! bitmaps for the PDF export.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{SightError, SightResult};
use crate::render::charts::{Bar, ChartModel, PieSegment};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 480;

const ACTUAL_COLOR: RGBColor = RGBColor(79, 70, 229);
const FORECAST_COLOR: RGBColor = RGBColor(165, 180, 252);
const SEGMENT_COLORS: [RGBColor; 3] = [
    RGBColor(79, 70, 229),
    RGBColor(236, 72, 153),
    RGBColor(245, 158, 11),
];

/// One chart of the dashboard's charts view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPane {
    Revenue,
    Expenses,
    Forecast,
}

impl ChartPane {
    pub fn title(&self) -> &'static str {
        match self {
            ChartPane::Revenue => "Динамика доходов",
            ChartPane::Expenses => "Структура расходов",
            ChartPane::Forecast => "Прогноз роста",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartPane::Revenue => "revenue.png",
            ChartPane::Expenses => "expenses.png",
            ChartPane::Forecast => "forecast.png",
        }
    }
}

/// An RGB8 bitmap produced by [`render_charts_bitmap`].
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Write one chart pane as a PNG file.
pub fn render_chart_png(path: &Path, pane: ChartPane, model: &ChartModel) -> SightResult<()> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    draw_pane(&root, pane, model)?;
    root.present().map_err(render_err)
}

/// Render the whole charts view (all three panes stacked) into an RGB
/// buffer, for embedding into the PDF report.
pub fn render_charts_bitmap(
    model: &ChartModel,
    width: u32,
    height: u32,
) -> SightResult<RasterImage> {
    let mut pixels = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        let panes = root.split_evenly((3, 1));
        draw_pane(&panes[0], ChartPane::Revenue, model)?;
        draw_pane(&panes[1], ChartPane::Expenses, model)?;
        draw_pane(&panes[2], ChartPane::Forecast, model)?;
        root.present().map_err(render_err)?;
    }
    Ok(RasterImage {
        width,
        height,
        pixels,
    })
}

fn draw_pane<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pane: ChartPane,
    model: &ChartModel,
) -> SightResult<()> {
    match pane {
        ChartPane::Revenue => draw_bars(root, pane.title(), &model.revenue_trend),
        ChartPane::Expenses => draw_donut(root, pane.title(), &model.expense_breakdown),
        ChartPane::Forecast => draw_bars(root, pane.title(), &model.forecast),
    }
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    bars: &[Bar],
) -> SightResult<()> {
    root.fill(&WHITE).map_err(render_err)?;

    let labels: Vec<String> = bars.iter().map(|b| short_label(&b.label)).collect();
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(32)
        .y_label_area_size(44)
        .build_cartesian_2d(0f64..bars.len().max(1) as f64, 0f64..110f64)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("% от максимума")
        .x_labels(bars.len().min(12))
        .x_label_formatter(&|x| {
            labels
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(idx, bar)| {
            let color = if bar.forecast {
                FORECAST_COLOR
            } else {
                ACTUAL_COLOR
            };
            Rectangle::new(
                [
                    (idx as f64 + 0.15, 0.0),
                    (idx as f64 + 0.85, bar.height_pct),
                ],
                color.filled(),
            )
        }))
        .map_err(render_err)?;

    Ok(())
}

fn draw_donut<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    segments: &[PieSegment],
) -> SightResult<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let area = root.titled(title, ("sans-serif", 24)).map_err(render_err)?;

    let (width, height) = area.dim_in_pixel();
    let cx = width as i32 / 2;
    let cy = height as i32 / 2;
    let radius = (width.min(height) / 2).saturating_sub(40) as i32;

    let mut start = -std::f64::consts::FRAC_PI_2;
    for (segment, color) in segments.iter().zip(SEGMENT_COLORS.iter().cycle()) {
        let end = start + segment.share_pct / 100.0 * std::f64::consts::TAU;
        area.draw(&Polygon::new(
            sector(cx, cy, radius, start, end),
            color.filled(),
        ))
        .map_err(render_err)?;
        start = end;
    }

    for (idx, (segment, color)) in segments.iter().zip(SEGMENT_COLORS.iter().cycle()).enumerate() {
        let y = 8 + idx as i32 * 20;
        area.draw(&Rectangle::new([(8, y), (20, y + 12)], color.filled()))
            .map_err(render_err)?;
        area.draw(&Text::new(
            format!("{} — {}%", segment.label, segment.share_pct),
            (26, y),
            ("sans-serif", 15),
        ))
        .map_err(render_err)?;
    }

    Ok(())
}

/// Axis labels keep the first three characters, like the dashboard's
/// abbreviated month ticks.
fn short_label(label: &str) -> String {
    label.chars().take(3).collect()
}

fn sector(cx: i32, cy: i32, radius: i32, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = 64;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((cx, cy));
    for step in 0..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        points.push((
            cx + (radius as f64 * angle.cos()).round() as i32,
            cy + (radius as f64 * angle.sin()).round() as i32,
        ));
    }
    points
}

fn render_err<E: std::fmt::Display>(e: E) -> SightError {
    SightError::Render(e.to_string())
}
