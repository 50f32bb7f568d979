//! PDF report export: rasterize one dashboard view and embed the bitmap as
//! the sole content of a single A4 portrait page.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tracing::debug;

use crate::error::{SightError, SightResult};
use crate::render::charts::build_charts;
use crate::render::raster::{self, RasterImage};
use crate::types::Dataset;

/// Fixed default output name of the exported report.
pub const DEFAULT_EXPORT_FILENAME: &str = "dashboard-report.pdf";

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// The capture bitmap is rendered at A4 proportions at this density, so the
/// embedded image fills the page width exactly.
const RASTER_DPI: f64 = 150.0;
const RASTER_WIDTH: u32 = 1240;
const RASTER_HEIGHT: u32 = 1754;

/// The view region a report captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRegion {
    Charts,
}

/// Capture `region` into a bitmap and write it as a one-page PDF.
///
/// When the region is not present (no dataset loaded) nothing is written
/// and no error is raised; the export is a silent no-op returning
/// `Ok(None)`.
pub fn export_report(
    dataset: Option<&Dataset>,
    region: ReportRegion,
    output: &Path,
) -> SightResult<Option<PathBuf>> {
    let Some(dataset) = dataset else {
        debug!("export skipped: target region is not present");
        return Ok(None);
    };

    let raster = match region {
        ReportRegion::Charts => {
            raster::render_charts_bitmap(&build_charts(dataset), RASTER_WIDTH, RASTER_HEIGHT)?
        }
    };

    write_pdf(&raster, output)?;
    Ok(Some(output.to_path_buf()))
}

fn write_pdf(raster: &RasterImage, output: &Path) -> SightResult<()> {
    let (doc, page, layer) = PdfDocument::new(
        "Financial Dashboard",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "report",
    );

    let rgb = RgbImage::from_raw(raster.width, raster.height, raster.pixels.clone())
        .ok_or_else(|| SightError::Export("raster buffer does not match its dimensions".into()))?;
    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb));

    // scale the bitmap to the full page width, anchored at the top
    let width_mm = raster.width as f64 * 25.4 / RASTER_DPI;
    let height_mm = raster.height as f64 * 25.4 / RASTER_DPI;
    let scale = PAGE_WIDTH_MM / width_mm;
    let top_offset = (PAGE_HEIGHT_MM - height_mm * scale).max(0.0);

    image.add_to_layer(
        doc.get_page(page).get_layer(layer),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(top_offset as f32)),
            scale_x: Some(scale as f32),
            scale_y: Some(scale as f32),
            dpi: Some(RASTER_DPI as f32),
            ..Default::default()
        },
    );

    let file = File::create(output)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| SightError::Export(e.to_string()))?;
    Ok(())
}
