//! Scene model: placed components, traces, selection, and the in-memory store.
//!
//! This module defines what is on the canvas (`Component`, `Trace`), the
//! ephemeral `Selection`, the in-progress `TraceDraft`, and the store that
//! owns all live data (`Scene`).
//!
//! Every mutator returns a [`Change`] telling the caller whether the edit was
//! a high-frequency live update (drag, live resize, draft growth) or a
//! commit-class mutation that must be recorded in history. The engine routes
//! `Change::Commit` to the history manager; the scene itself never holds
//! history.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{GridPoint, Point, grid_to_world, snap_world_to_grid, world_to_grid};
use crate::color::Rgb;
use crate::consts::{DEFAULT_COMPONENT_SIZE, MAX_SIZE, MIN_SIZE};

/// Unique identifier for a placed component.
pub type ComponentId = Uuid;

/// Unique identifier for a committed trace.
pub type TraceId = Uuid;

/// Outcome of a scene mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Change {
    /// Nothing changed (unknown id, rejected input).
    None,
    /// In-motion update; render it but do not snapshot.
    Live,
    /// Commit-class mutation; snapshot it.
    Commit,
}

impl Change {
    #[must_use]
    pub fn is_commit(self) -> bool {
        self == Self::Commit
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// Quarter-turn rotation of a component. Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// The next rotation step (0 → 90 → 180 → 270 → 0).
    #[must_use]
    pub fn quarter_turn(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Error for rotation values that are not a multiple of 90 in `[0, 270]`.
#[derive(Debug, thiserror::Error)]
#[error("unsupported rotation: {0} (expected 0, 90, 180 or 270)")]
pub struct RotationError(pub u16);

impl TryFrom<u16> for Rotation {
    type Error = RotationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(RotationError(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// A placed part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Part type; keys the pin definition.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name, also drawn on export placeholders.
    pub name: String,
    /// Opaque handle to the part's image asset.
    pub image_ref: String,
    /// World-space center x.
    pub x: f64,
    /// World-space center y.
    pub y: f64,
    /// Rotated footprint width.
    pub width: f64,
    /// Rotated footprint height.
    pub height: f64,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Component {
    /// Create a component centered on the grid-snapped `at`.
    ///
    /// `size` is the part's intrinsic asset size; when absent the default
    /// edge is used. Both axes are clamped to `[MIN_SIZE, MAX_SIZE]`.
    #[must_use]
    pub fn new(kind: &str, name: &str, image_ref: &str, at: Point, size: Option<(f64, f64)>) -> Self {
        let (w, h) = size.unwrap_or((DEFAULT_COMPONENT_SIZE, DEFAULT_COMPONENT_SIZE));
        let center = snap_world_to_grid(at);
        Self {
            id: Uuid::new_v4(),
            kind: kind.to_owned(),
            name: name.to_owned(),
            image_ref: image_ref.to_owned(),
            x: center.x,
            y: center.y,
            width: clamp_size(w),
            height: clamp_size(h),
            rotation: Rotation::Deg0,
        }
    }

    /// World-space center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// `(left, top, right, bottom)` of the centered bounding box.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        (self.x - hw, self.y - hh, self.x + hw, self.y + hh)
    }
}

/// Clamp one edge length into the allowed component range.
#[must_use]
pub fn clamp_size(v: f64) -> f64 {
    v.clamp(MIN_SIZE, MAX_SIZE)
}

/// A committed connector. Always has at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub id: TraceId,
    pub points: Vec<GridPoint>,
    pub color: Rgb,
    #[serde(default)]
    pub is_smart_draw: bool,
}

impl Trace {
    /// The trace as a world-space polyline, for drawing and export.
    #[must_use]
    pub fn world_points(&self) -> Vec<Point> {
        self.points.iter().copied().map(grid_to_world).collect()
    }
}

/// An in-progress trace. Never part of the committed scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDraft {
    pub points: Vec<GridPoint>,
    pub color: Rgb,
    pub is_smart_draw: bool,
}

/// Ids currently selected. Traces and components are tracked separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub traces: HashSet<TraceId>,
    pub components: HashSet<ComponentId>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.traces.clear();
        self.components.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty() && self.components.is_empty()
    }

    /// Total number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.traces.len() + self.components.len()
    }

    /// Add the component if absent, remove it if present.
    pub fn toggle_component(&mut self, id: ComponentId) {
        if !self.components.remove(&id) {
            self.components.insert(id);
        }
    }

    /// Add the trace if absent, remove it if present.
    pub fn toggle_trace(&mut self, id: TraceId) {
        if !self.traces.remove(&id) {
            self.traces.insert(id);
        }
    }
}

/// Deep copy of the committed scene, used by history and persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub components: Vec<Component>,
    pub traces: Vec<Trace>,
}

/// In-memory owner of the live scene.
///
/// Components keep placement order; later entries draw (and hit-test) on top.
#[derive(Debug, Default)]
pub struct Scene {
    components: Vec<Component>,
    traces: Vec<Trace>,
    selection: Selection,
    draft: Option<TraceDraft>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    #[must_use]
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn trace(&self, id: &TraceId) -> Option<&Trace> {
        self.traces.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn draft(&self) -> Option<&TraceDraft> {
        self.draft.as_ref()
    }

    /// Returns `true` when nothing is placed or drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.traces.is_empty()
    }

    // --- Components ---

    /// Add a component. Commit-class.
    pub fn place_component(&mut self, component: Component) -> Change {
        self.components.push(component);
        Change::Commit
    }

    /// Move a component's center to the grid-snapped `center`. Live.
    pub fn move_component(&mut self, id: &ComponentId, center: Point) -> Change {
        let Some(c) = self.component_mut(id) else {
            return Change::None;
        };
        let snapped = snap_world_to_grid(center);
        c.x = snapped.x;
        c.y = snapped.y;
        Change::Live
    }

    /// Set the footprint, clamped per axis. Live; used while a resize handle is dragged.
    pub fn set_component_size(&mut self, id: &ComponentId, width: f64, height: f64) -> Change {
        let Some(c) = self.component_mut(id) else {
            return Change::None;
        };
        c.width = clamp_size(width);
        c.height = clamp_size(height);
        Change::Live
    }

    /// Grow or shrink both edges by `delta`, clamped per axis. Commit-class.
    pub fn resize_component(&mut self, id: &ComponentId, delta: f64) -> Change {
        let Some(c) = self.component_mut(id) else {
            return Change::None;
        };
        c.width = clamp_size(c.width + delta);
        c.height = clamp_size(c.height + delta);
        Change::Commit
    }

    /// Rotate a quarter turn; the stored footprint swaps axes. Commit-class.
    pub fn rotate_component(&mut self, id: &ComponentId) -> Change {
        let Some(c) = self.component_mut(id) else {
            return Change::None;
        };
        c.rotation = c.rotation.quarter_turn();
        std::mem::swap(&mut c.width, &mut c.height);
        Change::Commit
    }

    /// Remove one component. Commit-class when it existed.
    pub fn delete_component(&mut self, id: &ComponentId) -> Change {
        self.delete_components(std::slice::from_ref(id))
    }

    /// Remove several components in one mutation.
    pub fn delete_components(&mut self, ids: &[ComponentId]) -> Change {
        let before = self.components.len();
        self.components.retain(|c| !ids.contains(&c.id));
        for id in ids {
            self.selection.components.remove(id);
        }
        if self.components.len() == before { Change::None } else { Change::Commit }
    }

    fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| &c.id == id)
    }

    // --- Traces ---

    /// Begin a draft at the grid vertex nearest `world`. Replaces any prior draft.
    pub fn start_trace(&mut self, world: Point, color: Rgb, is_smart_draw: bool) -> Change {
        self.draft = Some(TraceDraft { points: vec![world_to_grid(world)], color, is_smart_draw });
        Change::Live
    }

    /// Append the grid vertex nearest `world` unless it repeats the last one.
    pub fn extend_trace(&mut self, world: Point) -> Change {
        let Some(draft) = self.draft.as_mut() else {
            return Change::None;
        };
        let gp = world_to_grid(world);
        if draft.points.last() == Some(&gp) {
            return Change::None;
        }
        draft.points.push(gp);
        Change::Live
    }

    /// Replace the draft's vertices wholesale (smart-draw preview).
    pub fn replace_draft_points(&mut self, points: Vec<GridPoint>) -> Change {
        let Some(draft) = self.draft.as_mut() else {
            return Change::None;
        };
        if points.is_empty() {
            return Change::None;
        }
        draft.points = points;
        Change::Live
    }

    /// Promote the draft to a committed trace. Drafts with fewer than two
    /// points are dropped silently. The draft is cleared either way.
    pub fn commit_trace(&mut self) -> Change {
        let Some(draft) = self.draft.take() else {
            return Change::None;
        };
        if draft.points.len() < 2 {
            return Change::None;
        }
        self.traces.push(Trace {
            id: Uuid::new_v4(),
            points: draft.points,
            color: draft.color,
            is_smart_draw: draft.is_smart_draw,
        });
        Change::Commit
    }

    /// Discard the draft without touching committed state.
    pub fn cancel_trace(&mut self) -> Change {
        if self.draft.take().is_some() { Change::Live } else { Change::None }
    }

    /// Remove one trace. Commit-class when it existed.
    pub fn delete_trace(&mut self, id: &TraceId) -> Change {
        self.delete_traces(std::slice::from_ref(id))
    }

    /// Remove several traces in one mutation.
    pub fn delete_traces(&mut self, ids: &[TraceId]) -> Change {
        let before = self.traces.len();
        self.traces.retain(|t| !ids.contains(&t.id));
        for id in ids {
            self.selection.traces.remove(id);
        }
        if self.traces.len() == before { Change::None } else { Change::Commit }
    }

    // --- Selection ---

    /// Replace the selection wholesale.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Mutable access for incremental selection edits (toggle, extend).
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Select every trace and component.
    pub fn select_all(&mut self) {
        self.selection.traces = self.traces.iter().map(|t| t.id).collect();
        self.selection.components = self.components.iter().map(|c| c.id).collect();
    }

    /// Delete everything selected in a single commit and clear the selection.
    pub fn delete_selected(&mut self) -> Change {
        if self.selection.is_empty() {
            return Change::None;
        }
        let traces = std::mem::take(&mut self.selection.traces);
        let components = std::mem::take(&mut self.selection.components);
        let before = self.traces.len() + self.components.len();
        self.traces.retain(|t| !traces.contains(&t.id));
        self.components.retain(|c| !components.contains(&c.id));
        if self.traces.len() + self.components.len() == before { Change::None } else { Change::Commit }
    }

    // --- Whole scene ---

    /// Remove every component and trace. Commit-class.
    pub fn clear_scene(&mut self) -> Change {
        self.components.clear();
        self.traces.clear();
        self.selection.clear();
        self.draft = None;
        Change::Commit
    }

    /// Deep copy of the committed scene.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot { components: self.components.clone(), traces: self.traces.clone() }
    }

    /// Replace the committed scene with `snapshot`. Clears selection and any draft.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.components.clone_from(&snapshot.components);
        self.traces.clone_from(&snapshot.traces);
        self.selection.clear();
        self.draft = None;
    }
}
