pub use kurbo::{Point, Rect, Size, Vec2};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// US letter page width in millimeters.
pub const LETTER_WIDTH_MM: f64 = 215.9;
/// US letter page height in millimeters.
pub const LETTER_HEIGHT_MM: f64 = 279.4;

/// Width of one label slot in millimeters (4 in).
pub const SLOT_WIDTH_MM: f64 = 101.6;
/// Height of one label slot in millimeters (5 in).
pub const SLOT_HEIGHT_MM: f64 = 127.0;

/// Convert a length in millimeters to device pixels at `dpi`.
pub fn mm_to_px(mm: f64, dpi: u32) -> f64 {
    mm / MM_PER_INCH * f64::from(dpi)
}

/// Round a millimeter rectangle to whole device pixels at `dpi`.
///
/// Edges are rounded independently so adjacent rectangles never overlap or leave gaps.
pub fn rect_to_px(rect: Rect, dpi: u32) -> Rect {
    Rect::new(
        mm_to_px(rect.x0, dpi).round(),
        mm_to_px(rect.y0, dpi).round(),
        mm_to_px(rect.x1, dpi).round(),
        mm_to_px(rect.y1, dpi).round(),
    )
}

/// True when `a` and `b` agree within a tolerance suited to millimeter geometry.
#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
