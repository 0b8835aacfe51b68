//! Shared numeric constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// World units per grid step. Trace vertices live on this lattice.
pub const GRID_SIZE: f64 = 10.0;

// ── Components ──────────────────────────────────────────────────

/// Smallest allowed component edge, in world units.
pub const MIN_SIZE: f64 = 400.0;

/// Largest allowed component edge, in world units.
pub const MAX_SIZE: f64 = 1080.0;

/// Edge length used when a dropped part carries no intrinsic size.
pub const DEFAULT_COMPONENT_SIZE: f64 = 1080.0;

/// Step applied by keyboard resize (`Shift +` / `Shift -`).
pub const SIZE_INCREMENT: f64 = GRID_SIZE / 2.0;

/// Reference edge of the annotation images pin definitions are authored against.
pub const PIN_REFERENCE_SIZE: f64 = 1080.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// World-space radius within which a pointer snaps to a pin.
pub const SNAP_RADIUS: f64 = 25.0;

/// Per-axis tolerance for picking a trace vertex, in world units.
pub const TRACE_HIT_TOLERANCE: f64 = 5.0;

/// Screen-space hit slop in pixels for the resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Viewport ────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 2.0;

/// Wheel delta (pixels) that maps to a 1.0 change in scale.
pub const WHEEL_ZOOM_DIVISOR: f64 = 500.0;

// ── History / persistence ───────────────────────────────────────

/// Maximum number of retained undo snapshots.
pub const HISTORY_LIMIT: usize = 50;

pub const DEFAULT_AUTOSAVE_SECS: u64 = 30;
pub const MIN_AUTOSAVE_SECS: u64 = 10;

// ── Export ──────────────────────────────────────────────────────

/// Bounds reported for an empty scene: `(width, height)` anchored at the origin.
pub const EMPTY_SCENE_BOUNDS: (f64, f64) = (800.0, 600.0);

/// Grid pitch drawn into exported images, in pixels.
pub const EXPORT_GRID_PX: f64 = 20.0;

/// Largest accepted export padding, in pixels.
pub const EXPORT_MAX_PADDING: f64 = 1000.0;

/// Grid lines per axis above which the export grid is skipped.
pub const EXPORT_MAX_GRID_LINES: f64 = 4096.0;

/// Stroke width of exported traces, in pixels.
pub const EXPORT_TRACE_WIDTH: f64 = 12.0;

pub const EXPORT_MARKER_OUTER_RADIUS: f64 = 8.0;
pub const EXPORT_MARKER_INNER_RADIUS: f64 = 4.0;

/// Trace color used until the UI picks one.
pub const DEFAULT_TRACE_COLOR: &str = "#00e676";
