#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::GridPoint;
use crate::consts::EXPORT_MAX_PADDING;

struct Only(&'static str);

impl AssetCatalog for Only {
    fn is_available(&self, image_ref: &str) -> bool {
        image_ref == self.0
    }
}

fn part(kind: &str, image: &str, x: f64, y: f64) -> Component {
    Component::new(kind, kind, image, Point::new(x, y), Some((400.0, 400.0)))
}

fn trace(points: &[(i32, i32)]) -> Trace {
    Trace {
        id: uuid::Uuid::new_v4(),
        points: points.iter().map(|&(gx, gy)| GridPoint::new(gx, gy)).collect(),
        color: Rgb::new(0xff, 0x00, 0x00),
        is_smart_draw: false,
    }
}

fn no_grid() -> ExportOptions {
    ExportOptions { include_grid: false, ..ExportOptions::default() }
}

#[test]
fn empty_scene_exports_default_canvas() {
    let out = build_export(&[], &[], &ExportOptions::default(), &NoAssets);
    assert_eq!((out.width, out.height), (880.0, 680.0));
    assert!(matches!(out.ops[0], DrawOp::Fill { width, height, .. } if width == 880.0 && height == 680.0));
    assert_eq!(out.file_name, "circuit-diagram.png");
}

#[test]
fn size_is_bounds_plus_padding() {
    let comps = vec![part("led", "led.png", 0.0, 0.0)];
    let out = build_export(&comps, &[], &no_grid(), &NoAssets);
    assert_eq!((out.width, out.height), (480.0, 480.0));
}

#[test]
fn components_are_translated_by_bounds_origin() {
    let comps = vec![part("led", "led.png", 1000.0, 1000.0)];
    let out = build_export(&comps, &[], &no_grid(), &Only("led.png"));
    let image = out.ops.iter().find_map(|op| match op {
        DrawOp::Image { left, top, .. } => Some((*left, *top)),
        _ => None,
    });
    assert_eq!(image, Some((40.0, 40.0)));
}

#[test]
fn missing_asset_becomes_placeholder() {
    let comps = vec![part("relay", "relay.png", 0.0, 0.0)];
    let out = build_export(&comps, &[], &no_grid(), &NoAssets);
    assert!(out.ops.iter().any(|op| matches!(op, DrawOp::Placeholder { label, .. } if label == "relay")));
    assert!(!out.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
}

#[test]
fn traces_get_polyline_and_endpoint_markers() {
    let traces = vec![trace(&[(0, 0), (10, 0), (10, 10)])];
    let out = build_export(&[], &traces, &no_grid(), &NoAssets);
    let circles: Vec<_> = out.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).collect();
    assert_eq!(circles.len(), 4);
    let Some(DrawOp::Polyline { points, width, .. }) = out.ops.get(1) else {
        panic!("expected polyline after background");
    };
    assert_eq!(*width, EXPORT_TRACE_WIDTH);
    assert_eq!(points[0], Point::new(40.0, 40.0));
    assert_eq!(points[2], Point::new(140.0, 140.0));
}

#[test]
fn closed_trace_gets_single_marker() {
    let traces = vec![trace(&[(0, 0), (5, 0), (0, 0)])];
    let out = build_export(&[], &traces, &no_grid(), &NoAssets);
    let circles = out.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count();
    assert_eq!(circles, 2);
}

#[test]
fn grid_lines_precede_traces_and_components() {
    let comps = vec![part("led", "led.png", 0.0, 0.0)];
    let traces = vec![trace(&[(0, 0), (5, 0)])];
    let out = build_export(&comps, &traces, &ExportOptions::default(), &NoAssets);
    let first_grid = out.ops.iter().position(|op| matches!(op, DrawOp::GridLine { .. })).unwrap();
    let first_trace = out.ops.iter().position(|op| matches!(op, DrawOp::Polyline { .. })).unwrap();
    let first_comp = out.ops.iter().position(|op| matches!(op, DrawOp::Placeholder { .. })).unwrap();
    assert!(first_grid < first_trace && first_trace < first_comp);
}

#[test]
fn grid_keeps_world_alignment() {
    // Bounds start at -200; world x = 0 lands at 240 px, a grid line.
    let comps = vec![part("led", "led.png", 0.0, 0.0)];
    let out = build_export(&comps, &[], &ExportOptions::default(), &NoAssets);
    assert!(out.ops.iter().any(|op| matches!(op, DrawOp::GridLine { from, to } if from.x == 240.0 && to.x == 240.0)));
}

#[test]
fn padding_is_clamped() {
    let huge = ExportOptions { padding: 1e20, ..no_grid() };
    let out = build_export(&[], &[], &huge, &NoAssets);
    assert_eq!(out.width, 800.0 + 2.0 * EXPORT_MAX_PADDING);

    let bogus = ExportOptions { padding: f64::NAN, ..no_grid() };
    assert_eq!(build_export(&[], &[], &bogus, &NoAssets).width, 800.0);
    let negative = ExportOptions { padding: -5.0, ..no_grid() };
    assert_eq!(negative.effective_padding(), 0.0);
}

#[test]
fn huge_padding_with_grid_still_finishes() {
    let options = ExportOptions { padding: 1e20, ..ExportOptions::default() };
    let out = build_export(&[], &[], &options, &NoAssets);
    assert!(out.ops.iter().any(|op| matches!(op, DrawOp::GridLine { .. })));
}

#[test]
fn vast_scene_skips_the_grid() {
    let comps = vec![part("led", "led.png", 0.0, 0.0), part("led", "led.png", 1e12, 0.0)];
    let out = build_export(&comps, &[], &ExportOptions::default(), &NoAssets);
    assert!(!out.ops.iter().any(|op| matches!(op, DrawOp::GridLine { .. })));
    assert_eq!(out.ops.iter().filter(|op| matches!(op, DrawOp::Placeholder { .. })).count(), 2);
}

#[test]
fn jpeg_file_name() {
    let options = ExportOptions { format: ExportFormat::Jpeg, ..ExportOptions::default() };
    assert_eq!(build_export(&[], &[], &options, &NoAssets).file_name, "circuit-diagram.jpeg");
}

#[test]
fn options_deserialize_with_defaults() {
    let options: ExportOptions = serde_json::from_str(r##"{"format":"jpeg","background_color":"#ffffff"}"##).unwrap();
    assert_eq!(options.format, ExportFormat::Jpeg);
    assert_eq!(options.background_color, Rgb::WHITE);
    assert!(options.include_grid);
    assert_eq!(options.padding, 40.0);
}

// =============================================================
// Preview
// =============================================================

#[test]
fn preview_never_enlarges() {
    let t = preview_transform(&Rect::new(0.0, 0.0, 100.0, 50.0), 800.0, 600.0, 20.0);
    assert_eq!(t.scale, 1.0);
    assert_eq!((t.offset_x, t.offset_y), (350.0, 275.0));
}

#[test]
fn preview_fits_limiting_axis() {
    let t = preview_transform(&Rect::new(-500.0, 0.0, 1500.0, 500.0), 840.0, 600.0, 20.0);
    assert_eq!(t.scale, 0.4);
    assert_eq!(t.offset_x, 20.0 + 200.0);
    assert_eq!(t.offset_y, 200.0);
}
