//! Export feed: turns the scene into a positioned display list.
//!
//! The host rasterizes the list however it likes (canvas, image crate, SVG).
//! All coordinates here are output pixels: world coordinates shifted so the
//! scene bounds start at `padding`.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::camera::Point;
use crate::color::Rgb;
use crate::consts::{
    EXPORT_GRID_PX, EXPORT_MARKER_INNER_RADIUS, EXPORT_MARKER_OUTER_RADIUS, EXPORT_MAX_GRID_LINES, EXPORT_MAX_PADDING,
    EXPORT_TRACE_WIDTH,
};
use crate::doc::{Component, Trace};
use crate::hit::{Rect, compute_scene_bounds};

/// Raster format of the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Options chosen in the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub background_color: Rgb,
    pub include_grid: bool,
    /// Blank border around the content, in pixels.
    pub padding: f64,
}

impl ExportOptions {
    /// Padding clamped into `[0, EXPORT_MAX_PADDING]`; non-finite input means none.
    #[must_use]
    pub fn effective_padding(&self) -> f64 {
        if self.padding.is_finite() { self.padding.clamp(0.0, EXPORT_MAX_PADDING) } else { 0.0 }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            background_color: Rgb::new(0x1a, 0x1a, 0x2e),
            include_grid: true,
            padding: 40.0,
        }
    }
}

/// Tells the exporter which image handles can actually be drawn.
pub trait AssetCatalog {
    fn is_available(&self, image_ref: &str) -> bool;
}

/// Catalog that can load nothing; every component becomes a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetCatalog for NoAssets {
    fn is_available(&self, _image_ref: &str) -> bool {
        false
    }
}

/// One drawing primitive in output pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Fill { color: Rgb, width: f64, height: f64 },
    GridLine { from: Point, to: Point },
    Polyline { points: Vec<Point>, color: Rgb, width: f64 },
    Circle { center: Point, radius: f64, color: Rgb },
    Image { image_ref: String, left: f64, top: f64, width: f64, height: f64 },
    Placeholder { label: String, left: f64, top: f64, width: f64, height: f64 },
}

/// A fully laid-out export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportScene {
    pub file_name: String,
    pub width: f64,
    pub height: f64,
    pub bounds: Rect,
    pub ops: Vec<DrawOp>,
}

/// Lay out the scene for export.
///
/// Draw order: background, optional grid, traces (with endpoint markers),
/// then components. Components whose image is unavailable become labelled
/// placeholders.
#[must_use]
pub fn build_export(components: &[Component], traces: &[Trace], options: &ExportOptions, assets: &dyn AssetCatalog) -> ExportScene {
    let bounds = compute_scene_bounds(components, traces, 0.0);
    let pad = options.effective_padding();
    let width = bounds.width() + pad * 2.0;
    let height = bounds.height() + pad * 2.0;
    let to_px = |p: Point| Point::new(p.x - bounds.left + pad, p.y - bounds.top + pad);

    let mut ops = vec![DrawOp::Fill { color: options.background_color, width, height }];

    if options.include_grid {
        push_grid(&mut ops, &bounds, pad, width, height);
    }

    for trace in traces {
        let points: Vec<Point> = trace.world_points().into_iter().map(to_px).collect();
        let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
            continue;
        };
        ops.push(DrawOp::Polyline { points, color: trace.color, width: EXPORT_TRACE_WIDTH });
        push_marker(&mut ops, first, trace.color);
        if last != first {
            push_marker(&mut ops, last, trace.color);
        }
    }

    for c in components {
        let (left, top, _, _) = c.bounds();
        let origin = to_px(Point::new(left, top));
        ops.push(if assets.is_available(&c.image_ref) {
            DrawOp::Image { image_ref: c.image_ref.clone(), left: origin.x, top: origin.y, width: c.width, height: c.height }
        } else {
            DrawOp::Placeholder { label: c.name.clone(), left: origin.x, top: origin.y, width: c.width, height: c.height }
        });
    }

    ExportScene {
        file_name: format!("circuit-diagram.{}", options.format.extension()),
        width,
        height,
        bounds,
        ops,
    }
}

/// Grid lines aligned so that world multiples of the pitch stay on lines.
fn push_grid(ops: &mut Vec<DrawOp>, bounds: &Rect, pad: f64, width: f64, height: f64) {
    let fits = |extent: f64| {
        let lines = extent / EXPORT_GRID_PX;
        lines.is_finite() && lines <= EXPORT_MAX_GRID_LINES
    };
    if !(fits(width) && fits(height)) {
        warn!(width, height, "export too large for a grid; skipping grid lines");
        return;
    }
    let mut x = pad - bounds.left.rem_euclid(EXPORT_GRID_PX);
    while x <= width {
        ops.push(DrawOp::GridLine { from: Point::new(x, 0.0), to: Point::new(x, height) });
        x += EXPORT_GRID_PX;
    }
    let mut y = pad - bounds.top.rem_euclid(EXPORT_GRID_PX);
    while y <= height {
        ops.push(DrawOp::GridLine { from: Point::new(0.0, y), to: Point::new(width, y) });
        y += EXPORT_GRID_PX;
    }
}

fn push_marker(ops: &mut Vec<DrawOp>, center: Point, color: Rgb) {
    ops.push(DrawOp::Circle { center, radius: EXPORT_MARKER_OUTER_RADIUS, color });
    ops.push(DrawOp::Circle { center, radius: EXPORT_MARKER_INNER_RADIUS, color: Rgb::WHITE });
}

/// Fit transform used by the export preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Scale `bounds` into a `canvas_w × canvas_h` preview, never enlarging, and center it.
#[must_use]
pub fn preview_transform(bounds: &Rect, canvas_w: f64, canvas_h: f64, padding: f64) -> PreviewTransform {
    let content_w = bounds.width();
    let content_h = bounds.height();
    let fit = |avail: f64, content: f64| if content > 0.0 { avail / content } else { 1.0 };
    let scale = fit(canvas_w - padding * 2.0, content_w).min(fit(canvas_h - padding * 2.0, content_h)).min(1.0);
    PreviewTransform {
        scale,
        offset_x: (canvas_w - content_w * scale) / 2.0 - bounds.left * scale,
        offset_y: (canvas_h - content_h * scale) / 2.0 - bounds.top * scale,
    }
}
