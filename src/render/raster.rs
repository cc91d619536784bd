use std::path::Path;

use anyhow::Context;
use image::{Rgba, RgbaImage, imageops};

use crate::{
    foundation::core::{Rect, Size, mm_to_px, rect_to_px},
    foundation::error::{LabelError, LabelResult, SlotErrorKind},
    layout::grid::{GridPlan, PlacementPlan},
    render::backend::{RenderStats, Renderer, render_sheet},
};

/// Highest accepted raster resolution. A letter page at 600 dpi is ~135 MB of RGBA8.
pub const MAX_DPI: u32 = 600;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const ERROR_FILL: Rgba<u8> = Rgba([253, 236, 236, 255]);

// Outline and cross colour per failure class, so boxes can be told apart on paper.
fn error_stroke(kind: SlotErrorKind) -> Rgba<u8> {
    match kind {
        SlotErrorKind::PathRejected => Rgba([120, 40, 160, 255]),
        SlotErrorKind::NotFound => Rgba([200, 30, 30, 255]),
        SlotErrorKind::InvalidFormat => Rgba([220, 110, 0, 255]),
        SlotErrorKind::UnsupportedType => Rgba([30, 80, 200, 255]),
        SlotErrorKind::ProcessingError => Rgba([70, 70, 70, 255]),
    }
}

/// Reference renderer producing a straight-alpha RGBA8 page image.
///
/// Error boxes are drawn as a tinted slot with an outline and a diagonal cross whose colour
/// depends on the [`SlotErrorKind`]. There is no font stack, so the message is only logged.
#[derive(Clone, Debug)]
pub struct RasterRenderer {
    dpi: u32,
    canvas: RgbaImage,
}

impl RasterRenderer {
    /// Blank page of `page` millimeters at `dpi`.
    pub fn new(page: Size, dpi: u32) -> LabelResult<Self> {
        validate_dpi(dpi)?;
        let width = mm_to_px(page.width, dpi).round() as u32;
        let height = mm_to_px(page.height, dpi).round() as u32;
        if width == 0 || height == 0 {
            return Err(LabelError::validation("page must be at least one pixel"));
        }
        Ok(Self {
            dpi,
            canvas: RgbaImage::from_pixel(width, height, PAPER),
        })
    }

    /// Resolution in dots per inch.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Rendered page.
    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Take the rendered page.
    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Write the page as PNG.
    pub fn save_png(&self, path: &Path) -> LabelResult<()> {
        self.canvas
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write PNG '{}'", path.display()))?;
        Ok(())
    }

    fn stroke_px(&self) -> u32 {
        (self.dpi / 72).max(1)
    }
}

impl Renderer for RasterRenderer {
    fn begin_page(&mut self, page: Size) -> LabelResult<()> {
        *self = Self::new(page, self.dpi)?;
        Ok(())
    }

    fn draw_image(&mut self, plan: &PlacementPlan) -> LabelResult<()> {
        let target = rect_to_px(plan.draw_rect(), self.dpi);
        let width = (target.width() as u32).max(1);
        let height = (target.height() as u32).max(1);

        let pixels = plan.image.load()?.to_rgba8();
        let scaled = imageops::resize(&pixels, width, height, imageops::FilterType::Triangle);
        imageops::overlay(&mut self.canvas, &scaled, target.x0 as i64, target.y0 as i64);
        Ok(())
    }

    fn draw_error(&mut self, slot: Rect, kind: SlotErrorKind, message: &str) -> LabelResult<()> {
        tracing::info!(%kind, %message, "error box drawn");
        let px = rect_to_px(slot, self.dpi);
        fill_rect(&mut self.canvas, px, ERROR_FILL);

        let s = f64::from(self.stroke_px());
        let stroke = error_stroke(kind);
        draw_cross(&mut self.canvas, px, s, stroke);
        let edges = [
            Rect::new(px.x0, px.y0, px.x1, px.y0 + s),
            Rect::new(px.x0, px.y1 - s, px.x1, px.y1),
            Rect::new(px.x0, px.y0, px.x0 + s, px.y1),
            Rect::new(px.x1 - s, px.y0, px.x1, px.y1),
        ];
        for edge in edges {
            fill_rect(&mut self.canvas, edge, stroke);
        }
        Ok(())
    }
}

/// Rasterize `plan` at `dpi` and write it to `out` as PNG.
pub fn render_png(plan: &GridPlan, dpi: u32, out: &Path) -> LabelResult<RenderStats> {
    let mut raster = RasterRenderer::new(plan.page, dpi)?;
    let stats = render_sheet(plan, &mut raster)?;
    raster.save_png(out)?;
    tracing::info!(out = %out.display(), dpi, images = stats.images, errors = stats.errors, "sheet written");
    Ok(stats)
}

pub(crate) fn validate_dpi(dpi: u32) -> LabelResult<()> {
    if dpi == 0 || dpi > MAX_DPI {
        return Err(LabelError::validation(format!(
            "dpi must be in 1..={MAX_DPI}, got {dpi}"
        )));
    }
    Ok(())
}

// `rect` is in device pixels; it is clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let x0 = rect.x0.max(0.0) as u32;
    let y0 = rect.y0.max(0.0) as u32;
    let x1 = (rect.x1.max(0.0) as u32).min(canvas.width());
    let y1 = (rect.y1.max(0.0) as u32).min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

// Both diagonals of `rect` (device pixels), `width` pixels wide, one scanline at a time.
fn draw_cross(canvas: &mut RgbaImage, rect: Rect, width: f64, color: Rgba<u8>) {
    let (w, h) = (rect.width(), rect.height());
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let half = width / 2.0;
    let y0 = rect.y0.max(0.0) as u32;
    let y1 = (rect.y1.max(0.0) as u32).min(canvas.height());
    for y in y0..y1 {
        let row = f64::from(y);
        let t = (row + 0.5 - rect.y0) / h;
        for cx in [rect.x0 + t * w, rect.x1 - t * w] {
            fill_rect(canvas, Rect::new(cx - half, row, cx + half, row + 1.0), color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
