//! Spatial queries over the scene: pin snapping, rectangle selection, picking, bounds.
//!
//! All queries are brute-force scans. Scenes hold at most a few hundred pins,
//! so O(components × pins) per pointer event is cheap enough.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::{Point, grid_to_world, pin_local_to_world};
use crate::consts::{EMPTY_SCENE_BOUNDS, HANDLE_RADIUS_PX};
use crate::doc::{Component, ComponentId, Trace, TraceId};
use crate::pins::{Pin, PinLookup};

/// Axis-aligned rectangle in world space. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Normalized rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { left: a.x.min(b.x), top: a.y.min(b.y), right: a.x.max(b.x), bottom: a.y.max(b.y) }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Grow by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }
}

/// The pin closest to a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinMatch {
    pub component_id: ComponentId,
    pub pin: Pin,
    /// Pin position in world space.
    pub world: Point,
    pub distance: f64,
}

/// Closest pin to `world` strictly within `max_radius`.
///
/// Components are scanned in placement order and pins in definition order;
/// on exact distance ties the first one found wins.
#[must_use]
pub fn find_nearest_pin(world: Point, components: &[Component], pins: &dyn PinLookup, max_radius: f64) -> Option<PinMatch> {
    let mut best: Option<PinMatch> = None;
    for component in components {
        for pin in pins.pins_for(component) {
            let pin_world = pin_local_to_world(&pin, component);
            let distance = world.distance_to(pin_world);
            if distance >= max_radius {
                continue;
            }
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(PinMatch { component_id: component.id, pin, world: pin_world, distance });
            }
        }
    }
    best
}

/// Whether any vertex of `trace` falls inside `rect`.
///
/// This is a "touches a vertex" test: a segment that crosses the rectangle
/// with both endpoints outside is not detected.
#[must_use]
pub fn rect_intersects_trace(rect: &Rect, trace: &Trace) -> bool {
    trace.points.iter().any(|gp| rect.contains(grid_to_world(*gp)))
}

/// Whether the component's centered bounding box overlaps `rect` (touching counts).
#[must_use]
pub fn rect_intersects_component(rect: &Rect, component: &Component) -> bool {
    let (left, top, right, bottom) = component.bounds();
    !(right < rect.left || left > rect.right || bottom < rect.top || top > rect.bottom)
}

/// Topmost component whose bounding box contains `world`.
#[must_use]
pub fn component_at(world: Point, components: &[Component]) -> Option<ComponentId> {
    components
        .iter()
        .rev()
        .find(|c| {
            let (left, top, right, bottom) = c.bounds();
            world.x >= left && world.x <= right && world.y >= top && world.y <= bottom
        })
        .map(|c| c.id)
}

/// Whether `world` grabs the resize handle at `component`'s bottom-right corner.
///
/// The slop is fixed in screen pixels, so it shrinks in world units as the
/// view zooms in.
#[must_use]
pub fn resize_handle_hit(world: Point, component: &Component, scale: f64) -> bool {
    let (_, _, right, bottom) = component.bounds();
    let slop = HANDLE_RADIUS_PX / scale;
    (world.x - right).abs() <= slop && (world.y - bottom).abs() <= slop
}

/// First trace with a vertex within `tolerance` of `world` on both axes.
#[must_use]
pub fn trace_at(world: Point, traces: &[Trace], tolerance: f64) -> Option<TraceId> {
    traces
        .iter()
        .find(|t| {
            t.points.iter().any(|gp| {
                let p = grid_to_world(*gp);
                (p.x - world.x).abs() < tolerance && (p.y - world.y).abs() < tolerance
            })
        })
        .map(|t| t.id)
}

/// World-space bounding box of every component and trace vertex, grown by `margin`.
///
/// An empty scene reports a fixed 800×600 box at the origin so export and
/// preview always have a drawable area.
#[must_use]
pub fn compute_scene_bounds(components: &[Component], traces: &[Trace], margin: f64) -> Rect {
    let mut bounds: Option<Rect> = None;
    let mut include = |left: f64, top: f64, right: f64, bottom: f64| {
        bounds = Some(match bounds {
            None => Rect::new(left, top, right, bottom),
            Some(b) => Rect::new(b.left.min(left), b.top.min(top), b.right.max(right), b.bottom.max(bottom)),
        });
    };
    for trace in traces {
        for gp in &trace.points {
            let p = grid_to_world(*gp);
            include(p.x, p.y, p.x, p.y);
        }
    }
    for component in components {
        let (left, top, right, bottom) = component.bounds();
        include(left, top, right, bottom);
    }
    let (w, h) = EMPTY_SCENE_BOUNDS;
    bounds.unwrap_or(Rect::new(0.0, 0.0, w, h)).inflate(margin)
}
