use std::io::Cursor;

use super::*;
use crate::{
    LabelGridPlanner, Position, RawRequest,
    layout::grid::{RejectedPathPolicy, SheetLayout},
};

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.join(name), buf).unwrap();
}

fn center_px(rect: Rect, dpi: u32) -> (u32, u32) {
    let c = rect_to_px(rect, dpi).center();
    (c.x as u32, c.y as u32)
}

#[test]
fn letter_page_dimensions_follow_dpi() {
    let r = RasterRenderer::new(SheetLayout::LETTER_2X2.page(), 72).unwrap();
    assert_eq!(r.image().dimensions(), (612, 792));
    assert_eq!(r.dpi(), 72);
}

#[test]
fn dpi_outside_range_is_rejected() {
    let page = SheetLayout::LETTER_2X2.page();
    assert!(RasterRenderer::new(page, 0).is_err());
    assert!(RasterRenderer::new(page, MAX_DPI + 1).is_err());
    assert!(RasterRenderer::new(page, MAX_DPI).is_ok());
}

#[test]
fn draws_images_and_error_boxes_and_leaves_empty_slots_blank() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "red.png", 50, 50, [255, 0, 0, 255]);
    write_png(dir.path(), "blue.png", 80, 20, [0, 0, 255, 255]);

    let req = RawRequest::new()
        .with(Position::TopLeft, "red.png")
        .with(Position::TopRight, "blue.png")
        .with(Position::BottomLeft, "missing.png");
    let plan = LabelGridPlanner::new(dir.path()).build_plan(&req);

    let mut raster = RasterRenderer::new(plan.page, 72).unwrap();
    let stats = render_sheet(&plan, &mut raster).unwrap();
    assert_eq!(stats.images, 2);
    assert_eq!(stats.errors, 1);
    let img = raster.into_image();

    let layout = SheetLayout::LETTER_2X2;
    let (x, y) = center_px(layout.slot_rect(Position::TopLeft), 72);
    assert_eq!(img.get_pixel(x, y).0, [255, 0, 0, 255]);

    let (x, y) = center_px(layout.slot_rect(Position::TopRight), 72);
    assert_eq!(img.get_pixel(x, y).0, [0, 0, 255, 255]);

    let bl = rect_to_px(layout.slot_rect(Position::BottomLeft), 72);
    let not_found = error_stroke(SlotErrorKind::NotFound);
    assert_eq!(img.get_pixel(bl.x0 as u32, bl.y0 as u32).0, not_found.0);
    let (x, _) = center_px(layout.slot_rect(Position::BottomLeft), 72);
    let quarter = (bl.y0 + bl.height() / 4.0) as u32;
    assert_eq!(img.get_pixel(x, quarter).0, ERROR_FILL.0);

    let (x, y) = center_px(layout.slot_rect(Position::BottomRight), 72);
    assert_eq!(img.get_pixel(x, y).0, PAPER.0);
}

#[test]
fn render_png_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 10, 10, [0, 255, 0, 255]);
    let plan = LabelGridPlanner::new(dir.path())
        .build_plan(&RawRequest::new().with(Position::BottomRight, "a.png"));

    let out = dir.path().join("sheet.png");
    let stats = render_png(&plan, 36, &out).unwrap();
    assert_eq!(stats.images, 1);
    let written = image::open(&out).unwrap();
    assert_eq!((written.width(), written.height()), (306, 396));
}

#[test]
fn error_boxes_carry_a_cross_coloured_by_kind() {
    let dir = tempfile::tempdir().unwrap();
    let req = RawRequest::new()
        .with(Position::TopLeft, "missing.png")
        .with(Position::TopRight, "../outside.png");
    let plan = LabelGridPlanner::new(dir.path())
        .rejected_paths(RejectedPathPolicy::Surface)
        .build_plan(&req);

    let mut raster = RasterRenderer::new(plan.page, 72).unwrap();
    render_sheet(&plan, &mut raster).unwrap();
    let img = raster.into_image();

    let layout = SheetLayout::LETTER_2X2;
    let cases = [
        (Position::TopLeft, SlotErrorKind::NotFound),
        (Position::TopRight, SlotErrorKind::PathRejected),
    ];
    for (pos, kind) in cases {
        let stroke = error_stroke(kind);
        let px = rect_to_px(layout.slot_rect(pos), 72);
        assert_eq!(img.get_pixel(px.x0 as u32, px.y0 as u32).0, stroke.0);

        let (cx, cy) = center_px(layout.slot_rect(pos), 72);
        let crossed = (cx - 2..=cx + 2).any(|x| img.get_pixel(x, cy).0 == stroke.0);
        assert!(crossed, "{pos} has no cross through its centre");
    }
    assert_ne!(
        error_stroke(SlotErrorKind::NotFound),
        error_stroke(SlotErrorKind::PathRejected)
    );
}
