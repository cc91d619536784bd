use std::io::Cursor;

use super::*;
use crate::{Position, SlotPlan};

fn write_png(dir: &std::path::Path, name: &str, width: u32, height: u32) {
    let img = image::RgbaImage::new(width, height);
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.join(name), buf).unwrap();
}

#[test]
fn batch_matches_sequential_planning_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 300, 100);
    write_png(dir.path(), "tall.png", 100, 300);

    let requests: Vec<_> = (0..16)
        .map(|i| {
            let name = if i % 2 == 0 { "wide.png" } else { "tall.png" };
            RawRequest::new()
                .with(Position::TopLeft, name)
                .with(Position::BottomRight, "missing.png")
        })
        .collect();

    let planner = LabelGridPlanner::new(dir.path());
    let batch = plan_batch(&planner, &requests, Some(4)).unwrap();
    assert_eq!(batch.len(), requests.len());
    for (req, plan) in requests.iter().zip(&batch) {
        assert_eq!(plan, &planner.build_plan(req));
    }

    let Some(SlotPlan::Image(p)) = batch[0].get(Position::TopLeft) else {
        panic!("expected image plan");
    };
    assert!(p.rotated);
}

#[test]
fn shared_source_is_never_modified_by_rotation() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 64, 16);
    let before = std::fs::read(dir.path().join("wide.png")).unwrap();

    let requests = vec![RawRequest::new().with(Position::TopLeft, "wide.png"); 32];
    let planner = LabelGridPlanner::new(dir.path());
    let plans = plan_batch(&planner, &requests, None).unwrap();

    assert!(plans.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(std::fs::read(dir.path().join("wide.png")).unwrap(), before);
}

#[test]
fn zero_threads_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let planner = LabelGridPlanner::new(dir.path());
    let err = plan_batch(&planner, &[], Some(0)).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}
