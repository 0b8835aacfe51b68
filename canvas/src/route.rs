//! Orthogonal trace routing for the smart-draw tool.
//!
//! The router emits a single-bend "L" between two points. It does not avoid
//! obstacles; components under the path are simply crossed.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use crate::camera::{GridPoint, Point, world_to_grid};

/// Route from `start` to `end` (world space) as a 2- or 3-vertex grid polyline.
///
/// The longer axis is traversed first; ties go horizontal-first. The bend is
/// omitted when the endpoints share the first-leg coordinate.
#[must_use]
pub fn route_orthogonal(start: Point, end: Point) -> Vec<GridPoint> {
    route_grid(world_to_grid(start), world_to_grid(end))
}

/// [`route_orthogonal`] for endpoints already on the grid.
#[must_use]
pub fn route_grid(start: GridPoint, end: GridPoint) -> Vec<GridPoint> {
    let dx = end.gx - start.gx;
    let dy = end.gy - start.gy;
    let mut points = Vec::with_capacity(3);
    points.push(start);
    if dx.abs() >= dy.abs() {
        if dx != 0 {
            points.push(GridPoint::new(end.gx, start.gy));
        }
    } else if dy != 0 {
        points.push(GridPoint::new(start.gx, end.gy));
    }
    points.push(end);
    points
}
