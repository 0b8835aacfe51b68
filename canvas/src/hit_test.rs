#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::GridPoint;
use crate::color::Rgb;
use crate::consts::{SNAP_RADIUS, TRACE_HIT_TOLERANCE};
use crate::pins::PinCache;

fn part(x: f64, y: f64, size: f64) -> Component {
    Component::new("led", "LED", "led.png", Point::new(x, y), Some((size, size)))
}

fn trace(points: &[(i32, i32)]) -> Trace {
    Trace {
        id: uuid::Uuid::new_v4(),
        points: points.iter().map(|&(gx, gy)| GridPoint::new(gx, gy)).collect(),
        color: Rgb::default(),
        is_smart_draw: false,
    }
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalizes() {
    let r = Rect::from_corners(Point::new(50.0, -10.0), Point::new(-20.0, 30.0));
    assert_eq!(r, Rect::new(-20.0, -10.0, 50.0, 30.0));
    assert_eq!(r.width(), 70.0);
    assert_eq!(r.height(), 40.0);
}

#[test]
fn rect_contains_is_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(10.0, 0.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
}

// =============================================================
// Nearest pin
// =============================================================

#[test]
fn nearest_pin_within_radius() {
    // 400×400 LED at origin: synthetic pins at (-100, 0) and (100, 0).
    let comps = vec![part(0.0, 0.0, 400.0)];
    let cache = PinCache::new();
    let m = find_nearest_pin(Point::new(95.0, 4.0), &comps, &cache, SNAP_RADIUS).unwrap();
    assert_eq!(m.pin.id, "PIN2");
    assert_eq!(m.world, Point::new(100.0, 0.0));
    assert_eq!(m.component_id, comps[0].id);
}

#[test]
fn nearest_pin_respects_strict_radius() {
    let comps = vec![part(0.0, 0.0, 400.0)];
    let cache = PinCache::new();
    assert!(find_nearest_pin(Point::new(125.0, 0.0), &comps, &cache, SNAP_RADIUS).is_none());
    assert!(find_nearest_pin(Point::new(124.0, 0.0), &comps, &cache, SNAP_RADIUS).is_some());
}

#[test]
fn nearest_pin_prefers_closer_component() {
    let comps = vec![part(0.0, 0.0, 400.0), part(220.0, 0.0, 400.0)];
    let cache = PinCache::new();
    // PIN2 of the first sits at x=100, PIN1 of the second at x=120.
    let m = find_nearest_pin(Point::new(112.0, 0.0), &comps, &cache, SNAP_RADIUS).unwrap();
    assert_eq!(m.component_id, comps[1].id);
    assert_eq!(m.pin.id, "PIN1");
}

#[test]
fn nearest_pin_tie_goes_to_first_found() {
    let comps = vec![part(0.0, 0.0, 400.0), part(220.0, 0.0, 400.0)];
    let cache = PinCache::new();
    let m = find_nearest_pin(Point::new(110.0, 0.0), &comps, &cache, SNAP_RADIUS).unwrap();
    assert_eq!(m.component_id, comps[0].id);
}

#[test]
fn nearest_pin_on_empty_scene_is_none() {
    assert!(find_nearest_pin(Point::default(), &[], &PinCache::new(), SNAP_RADIUS).is_none());
}

// =============================================================
// Rectangle selection
// =============================================================

#[test]
fn rect_hits_trace_on_vertex() {
    let t = trace(&[(0, 0), (10, 0)]);
    assert!(rect_intersects_trace(&Rect::new(95.0, -5.0, 105.0, 5.0), &t));
}

#[test]
fn rect_crossing_segment_without_vertex_misses() {
    let t = trace(&[(0, 0), (10, 0)]);
    assert!(!rect_intersects_trace(&Rect::new(40.0, -5.0, 60.0, 5.0), &t));
}

#[test]
fn component_fully_inside_rect_is_selected() {
    let c = part(0.0, 0.0, 400.0);
    assert!(rect_intersects_component(&Rect::new(-500.0, -500.0, 500.0, 500.0), &c));
}

#[test]
fn component_fully_outside_rect_is_not_selected() {
    let c = part(0.0, 0.0, 400.0);
    assert!(!rect_intersects_component(&Rect::new(300.0, 300.0, 600.0, 600.0), &c));
    assert!(!rect_intersects_component(&Rect::new(-600.0, -50.0, -250.0, 50.0), &c));
}

#[test]
fn rect_touching_component_edge_counts() {
    let c = part(0.0, 0.0, 400.0);
    assert!(rect_intersects_component(&Rect::new(200.0, 0.0, 300.0, 50.0), &c));
    assert!(!rect_intersects_component(&Rect::new(200.5, 0.0, 300.0, 50.0), &c));
}

// =============================================================
// Picking
// =============================================================

#[test]
fn component_at_returns_topmost() {
    let comps = vec![part(0.0, 0.0, 400.0), part(100.0, 0.0, 400.0)];
    assert_eq!(component_at(Point::new(150.0, 0.0), &comps), Some(comps[1].id));
    assert_eq!(component_at(Point::new(-150.0, 0.0), &comps), Some(comps[0].id));
    assert_eq!(component_at(Point::new(1000.0, 0.0), &comps), None);
}

#[test]
fn resize_handle_slop_scales_with_zoom() {
    let c = part(0.0, 0.0, 400.0);
    assert!(resize_handle_hit(Point::new(206.0, 195.0), &c, 1.0));
    assert!(!resize_handle_hit(Point::new(206.0, 195.0), &c, 2.0));
    assert!(!resize_handle_hit(Point::new(0.0, 0.0), &c, 1.0));
}

#[test]
fn trace_at_uses_per_axis_tolerance() {
    let traces = vec![trace(&[(0, 0), (5, 0)])];
    assert_eq!(trace_at(Point::new(54.0, 4.0), &traces, TRACE_HIT_TOLERANCE), Some(traces[0].id));
    assert_eq!(trace_at(Point::new(55.0, 0.0), &traces, TRACE_HIT_TOLERANCE), None);
}

// =============================================================
// Scene bounds
// =============================================================

#[test]
fn empty_scene_bounds_default() {
    assert_eq!(compute_scene_bounds(&[], &[], 0.0), Rect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(compute_scene_bounds(&[], &[], 10.0), Rect::new(-10.0, -10.0, 810.0, 610.0));
}

#[test]
fn bounds_cover_components_and_trace_vertices() {
    let comps = vec![part(0.0, 0.0, 400.0)];
    let traces = vec![trace(&[(30, 0), (30, -40)])];
    let b = compute_scene_bounds(&comps, &traces, 0.0);
    assert_eq!(b, Rect::new(-200.0, -400.0, 300.0, 200.0));
}
