//! Coordinate engine: screen, world, grid and component-local spaces.
//!
//! Every conversion the editor performs goes through this module so that
//! rendering, hit-testing, snapping and export agree on the same math.
//!
//! - **Screen** space is viewport pixels after pan and zoom.
//! - **World** space is the continuous, pan-independent plane entities live in.
//! - **Grid** space is the integer lattice trace vertices are stored on.
//! - **Pin-local** space is a component's unrotated asset space, origin at the
//!   image's top-left corner.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_DIVISOR};
use crate::doc::{Component, Rotation};
use crate::pins::Pin;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A vertex on the trace grid. `world = grid * GRID_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub gx: i32,
    pub gy: i32,
}

impl GridPoint {
    #[must_use]
    pub fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }
}

/// Pan/zoom state for the infinite canvas.
///
/// Maps world to screen as `screen = world * scale + offset`. `offset_x` /
/// `offset_y` are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset_x,
            y: world.y * self.scale + self.offset_y,
        }
    }

    /// Shift the view by a screen-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Apply a wheel delta to the scale. Positive `delta_y` (scroll down) zooms out.
    ///
    /// The offset is left untouched, so zoom anchors at the screen origin.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        let next = self.scale - delta_y / WHEEL_ZOOM_DIVISOR;
        self.scale = next.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Round half toward positive infinity, matching the rounding used when the
/// grid was first laid out.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Snap a world point to the nearest grid vertex.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn world_to_grid(world: Point) -> GridPoint {
    GridPoint {
        gx: round_half_up(world.x / GRID_SIZE) as i32,
        gy: round_half_up(world.y / GRID_SIZE) as i32,
    }
}

/// Exact inverse of [`world_to_grid`] for grid-aligned input.
///
/// This is the only grid-to-world conversion in the crate; rendering,
/// hit-testing and export all call it with a [`GridPoint`].
#[must_use]
pub fn grid_to_world(grid: GridPoint) -> Point {
    Point {
        x: f64::from(grid.gx) * GRID_SIZE,
        y: f64::from(grid.gy) * GRID_SIZE,
    }
}

/// Round a continuous world point to the nearest grid-aligned world point.
#[must_use]
pub fn snap_world_to_grid(world: Point) -> Point {
    Point {
        x: round_half_up(world.x / GRID_SIZE) * GRID_SIZE,
        y: round_half_up(world.y / GRID_SIZE) * GRID_SIZE,
    }
}

/// Width and height of a component before its rotation was applied.
///
/// Stored dimensions already describe the rotated footprint, so quarter and
/// three-quarter turns swap them back.
#[must_use]
pub fn unrotated_footprint(component: &Component) -> (f64, f64) {
    match component.rotation {
        Rotation::Deg0 | Rotation::Deg180 => (component.width, component.height),
        Rotation::Deg90 | Rotation::Deg270 => (component.height, component.width),
    }
}

/// Rotate an offset from the component center by `rotation`.
#[must_use]
pub fn rotate_offset(px: f64, py: f64, rotation: Rotation) -> (f64, f64) {
    match rotation {
        Rotation::Deg0 => (px, py),
        Rotation::Deg90 => (-py, px),
        Rotation::Deg180 => (-px, -py),
        Rotation::Deg270 => (py, -px),
    }
}

/// Undo [`rotate_offset`].
#[must_use]
pub fn unrotate_offset(rx: f64, ry: f64, rotation: Rotation) -> (f64, f64) {
    match rotation {
        Rotation::Deg0 => (rx, ry),
        Rotation::Deg90 => (ry, -rx),
        Rotation::Deg180 => (-rx, -ry),
        Rotation::Deg270 => (-ry, rx),
    }
}

/// World position of `pin` on `component`, honoring the component's rotation.
#[must_use]
pub fn pin_local_to_world(pin: &Pin, component: &Component) -> Point {
    let (w, h) = unrotated_footprint(component);
    let px = pin.local_x - w / 2.0;
    let py = pin.local_y - h / 2.0;
    let (rx, ry) = rotate_offset(px, py, component.rotation);
    Point { x: component.x + rx, y: component.y + ry }
}

/// Map a world point back into `component`'s pin-local space.
#[must_use]
pub fn world_to_pin_local(world: Point, component: &Component) -> Point {
    let (w, h) = unrotated_footprint(component);
    let (px, py) = unrotate_offset(world.x - component.x, world.y - component.y, component.rotation);
    Point { x: px + w / 2.0, y: py + h / 2.0 }
}
