//! Engine: routes user intent into scene mutations, history and persistence.
//!
//! DESIGN
//! ======
//! `EngineCore` owns every piece of session state: the scene, the viewport,
//! the history manager, the pin cache, the UI state and the active gesture.
//! The host drives it with [`Command`]s and renders or forwards whatever
//! [`Action`]s come back. There is no I/O here beyond the injected
//! [`KeyValueStore`] and [`PinSource`], so the whole state machine runs in
//! plain unit tests.
//!
//! Commit-class mutations go through [`EngineCore::apply`], which records a
//! history entry (and autosaves) exactly once per user-visible edit. Live
//! updates (drag, live resize, draft growth) only request a render.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bus::Command;
use crate::camera::{Point, Viewport};
use crate::color::Rgb;
use crate::consts::{SIZE_INCREMENT, SNAP_RADIUS, TRACE_HIT_TOLERANCE};
use crate::doc::{Change, Component, ComponentId, Scene, Selection, TraceId};
use crate::export::{AssetCatalog, ExportOptions, ExportScene, NoAssets, build_export};
use crate::hit::{
    PinMatch, Rect, component_at, find_nearest_pin, rect_intersects_component, rect_intersects_trace,
    resize_handle_hit, trace_at,
};
use crate::history::{AutosaveSettings, HistoryManager};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::pins::{PinCache, PinSource, SyntheticOnly};
use crate::route::route_orthogonal;
use crate::storage::{KeyValueStore, LoadedState, MemoryStore, now_ms, read_state};

/// Outcome of a save attempt, as shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    Saving,
    Saved { at: i64 },
    Failed,
}

/// Notifications returned from command handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Something visible changed; redraw.
    RenderNeeded,
    /// The committed scene changed.
    SceneChanged { components: usize, traces: usize },
    SelectionChanged { components: Vec<ComponentId>, traces: Vec<TraceId> },
    ViewportChanged { scale: f64, offset_x: f64, offset_y: f64 },
    HistoryChanged { can_undo: bool, can_redo: bool },
    ToolChanged { tool: Tool },
    SetCursor { cursor: String },
    SaveStatus { status: SaveStatus },
    /// Pin under the pointer while a drawing tool is active (snap indicator).
    PinHover { hover: Option<PinMatch> },
    /// Secondary click landed on something a context menu can act on.
    ContextMenu { at: Point, component: Option<ComponentId>, trace: Option<TraceId> },
    AutosaveChanged { enabled: bool, interval_secs: u64 },
    ExportReady { export: ExportScene },
}

/// Core engine state. All logic, no transport.
pub struct EngineCore {
    pub scene: Scene,
    pub viewport: Viewport,
    pub history: HistoryManager,
    pub pins: PinCache,
    pub ui: UiState,
    pub input: InputState,
    /// Trace targeted by the last secondary click.
    pub context_trace: Option<TraceId>,
    store: Box<dyn KeyValueStore + Send>,
    pin_source: Box<dyn PinSource + Send>,
    assets: Box<dyn AssetCatalog + Send>,
    clock: fn() -> i64,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()), Box::new(SyntheticOnly))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore + Send>, pin_source: Box<dyn PinSource + Send>) -> Self {
        Self {
            scene: Scene::new(),
            viewport: Viewport::default(),
            history: HistoryManager::default(),
            pins: PinCache::new(),
            ui: UiState::default(),
            input: InputState::default(),
            context_trace: None,
            store,
            pin_source,
            assets: Box::new(NoAssets),
            clock: now_ms,
            cursor: "default",
        }
    }

    /// Replace the export asset catalog.
    #[must_use]
    pub fn with_assets(mut self, assets: Box<dyn AssetCatalog + Send>) -> Self {
        self.assets = assets;
        self
    }

    /// Replace the autosave settings.
    #[must_use]
    pub fn with_autosave(mut self, settings: AutosaveSettings) -> Self {
        self.history.settings = settings;
        self
    }

    /// Replace the wall clock (tests pin timestamps with this).
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Read access to the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// The cursor most recently reported to the host.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.cursor
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Handle one command and return the resulting notifications.
    pub fn dispatch(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::SetTool { tool } => self.set_tool(tool),
            Command::SetTraceColor { color } => {
                self.set_trace_color(color);
                Vec::new()
            }
            Command::PlacePart { kind, name, image_ref, at, size } => self.place_part(&kind, &name, &image_ref, at, size),
            Command::PointerDown { at, button, modifiers } => self.on_pointer_down(at, button, modifiers),
            Command::PointerMove { at, modifiers } => self.on_pointer_move(at, modifiers),
            Command::PointerUp { at, button, modifiers } => self.on_pointer_up(at, button, modifiers),
            Command::Wheel { at, delta, modifiers } => self.on_wheel(at, delta, modifiers),
            Command::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
            Command::KeyUp { key, modifiers } => self.on_key_up(&key, modifiers),
            Command::DeleteSelected => self.delete_selected(),
            Command::DeleteTarget => self.delete_target(),
            Command::SelectAll => self.select_all(),
            Command::ClearSelection => {
                self.scene.clear_selection();
                vec![self.selection_action()]
            }
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::ResizeTarget { delta } => self.resize_target(delta),
            Command::RotateTarget => self.rotate_target(),
            Command::Save => self.save(),
            Command::ClearAll => self.clear_all(),
            Command::SetAutosave { enabled, interval_secs } => self.set_autosave(enabled, interval_secs),
            Command::Export { options } => vec![Action::ExportReady { export: self.export(&options) }],
            Command::AutosaveTick => self.autosave_tick(),
            Command::Restore => self.restore(),
            Command::ReloadPins { kind } => self.reload_pins(kind.as_deref()),
        }
    }

    // =========================================================================
    // COMMIT PLUMBING
    // =========================================================================

    /// Route a scene [`Change`] to history or the renderer.
    pub fn apply(&mut self, change: Change) -> Vec<Action> {
        match change {
            Change::None => Vec::new(),
            Change::Live => vec![Action::RenderNeeded],
            Change::Commit => self.commit(),
        }
    }

    fn commit(&mut self) -> Vec<Action> {
        let now = (self.clock)();
        let saved = self.history.commit(&self.scene, &self.viewport, self.store.as_mut(), now);
        let mut actions = vec![self.scene_action(), self.history_action(), Action::RenderNeeded];
        if let Some(ok) = saved {
            actions.push(Self::save_action(ok, now));
        }
        actions
    }

    fn scene_action(&self) -> Action {
        Action::SceneChanged { components: self.scene.components().len(), traces: self.scene.traces().len() }
    }

    fn history_action(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    fn viewport_action(&self) -> Action {
        Action::ViewportChanged {
            scale: self.viewport.scale,
            offset_x: self.viewport.offset_x,
            offset_y: self.viewport.offset_y,
        }
    }

    fn selection_action(&self) -> Action {
        let mut components: Vec<ComponentId> = self.scene.selection().components.iter().copied().collect();
        let mut traces: Vec<TraceId> = self.scene.selection().traces.iter().copied().collect();
        components.sort_unstable();
        traces.sort_unstable();
        Action::SelectionChanged { components, traces }
    }

    fn save_action(ok: bool, at: i64) -> Action {
        let status = if ok { SaveStatus::Saved { at } } else { SaveStatus::Failed };
        Action::SaveStatus { status }
    }

    // =========================================================================
    // TOOLS / PLACEMENT
    // =========================================================================

    /// Switch tools. Abandons any gesture in progress and clears the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        self.ui.tool = tool;
        self.ui.space_pan = false;
        self.scene.clear_selection();
        actions.push(Action::ToolChanged { tool });
        actions.push(self.selection_action());
        if !tool.is_drawing() && self.ui.hover_pin.take().is_some() {
            actions.push(Action::PinHover { hover: None });
        }
        self.push_cursor(&mut actions);
        actions
    }

    pub fn set_trace_color(&mut self, color: Rgb) {
        self.ui.trace_color = color;
    }

    /// Drop a part centered on the grid-snapped world position under `screen`.
    pub fn place_part(&mut self, kind: &str, name: &str, image_ref: &str, screen: Point, size: Option<(f64, f64)>) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen);
        let component = Component::new(kind, name, image_ref, world, size);
        info!(id = %component.id, kind = %component.kind, x = component.x, y = component.y, "component placed");
        self.pins.ensure(self.pin_source.as_ref(), kind);
        let change = self.scene.place_component(component);
        self.apply(change)
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_pointer = Some(screen);
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();

        if button == Button::Secondary {
            return self.open_context_menu(screen, world);
        }

        if button == Button::Middle || self.ui.tool == Tool::Pan || self.ui.space_pan {
            self.input = InputState::Panning { last_screen: screen };
            self.push_cursor(&mut actions);
            return actions;
        }

        match self.ui.tool {
            Tool::Pointer => actions.extend(self.pointer_down_pointer(world, modifiers)),
            Tool::Select => {
                self.scene.clear_selection();
                self.ui.context_target = None;
                self.input = InputState::SelectingRect { start_screen: screen };
                actions.push(self.selection_action());
            }
            Tool::Draw => {
                let change = self.scene.start_trace(world, self.ui.trace_color, false);
                self.input = InputState::DrawingTrace;
                actions.extend(self.apply(change));
            }
            Tool::SmartDraw => actions.extend(self.smart_draw_click(world)),
            Tool::Pan => {}
        }
        self.push_cursor(&mut actions);
        actions
    }

    fn pointer_down_pointer(&mut self, world: Point, modifiers: Modifiers) -> Vec<Action> {
        if let Some(target) = self.ui.context_target.and_then(|id| self.scene.component(&id))
            && resize_handle_hit(world, target, self.viewport.scale)
        {
            self.input = InputState::ResizingComponent { id: target.id, orig_size: (target.width, target.height) };
            return Vec::new();
        }

        let Some(id) = component_at(world, self.scene.components()) else {
            if modifiers.any_select_modifier() {
                return Vec::new();
            }
            self.scene.clear_selection();
            self.ui.context_target = None;
            self.context_trace = None;
            return vec![self.selection_action(), Action::RenderNeeded];
        };

        if modifiers.any_select_modifier() {
            self.scene.selection_mut().toggle_component(id);
        } else {
            self.scene.clear_selection();
            self.ui.context_target = Some(id);
            self.context_trace = None;
        }
        let Some(center) = self.scene.component(&id).map(Component::center) else {
            return Vec::new();
        };
        self.input = InputState::DraggingComponent {
            id,
            grab_offset: Point::new(world.x - center.x, world.y - center.y),
            orig_center: center,
        };
        vec![self.selection_action(), Action::RenderNeeded]
    }

    fn smart_draw_click(&mut self, world: Point) -> Vec<Action> {
        let end = self.snap_to_pin(world);
        if let InputState::SmartDrawing { start_world } = self.input {
            self.input = InputState::Idle;
            let routed = self.scene_replace_route(start_world, end);
            let mut actions = self.apply(routed);
            let change = self.scene.commit_trace();
            actions.extend(self.apply(change));
            return actions;
        }
        let change = self.scene.start_trace(end, self.ui.trace_color, true);
        self.input = InputState::SmartDrawing { start_world: end };
        self.apply(change)
    }

    fn scene_replace_route(&mut self, start: Point, end: Point) -> Change {
        self.scene.replace_draft_points(route_orthogonal(start, end))
    }

    fn open_context_menu(&mut self, screen: Point, world: Point) -> Vec<Action> {
        if self.ui.tool.is_drawing() {
            return Vec::new();
        }
        let component = component_at(world, self.scene.components());
        let trace = if component.is_some() { None } else { trace_at(world, self.scene.traces(), TRACE_HIT_TOLERANCE) };
        self.ui.context_target = component;
        self.context_trace = trace;
        if component.is_none() && trace.is_none() && self.scene.selection().is_empty() {
            return Vec::new();
        }
        vec![Action::ContextMenu { at: screen, component, trace }, Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_pointer = Some(screen);
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();

        match self.input.clone() {
            InputState::Idle => {}
            InputState::Panning { last_screen } => {
                self.viewport.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen };
                actions.push(self.viewport_action());
            }
            InputState::DraggingComponent { id, grab_offset, .. } => {
                let change = self.scene.move_component(&id, Point::new(world.x - grab_offset.x, world.y - grab_offset.y));
                actions.extend(self.apply(change));
            }
            InputState::ResizingComponent { id, .. } => {
                if let Some(center) = self.scene.component(&id).map(Component::center) {
                    let size = (world.x - center.x).abs() * 2.0;
                    let change = self.scene.set_component_size(&id, size, size);
                    actions.extend(self.apply(change));
                }
            }
            InputState::SelectingRect { start_screen } => {
                let rect = Rect::from_corners(self.viewport.screen_to_world(start_screen), world);
                self.scene.set_selection(self.select_in_rect(&rect));
                actions.push(self.selection_action());
                actions.push(Action::RenderNeeded);
            }
            InputState::DrawingTrace => {
                let change = self.scene.extend_trace(world);
                actions.extend(self.apply(change));
            }
            InputState::SmartDrawing { start_world } => {
                let end = self.snap_to_pin(world);
                let change = self.scene_replace_route(start_world, end);
                actions.extend(self.apply(change));
            }
        }

        if self.ui.tool.is_drawing() {
            actions.extend(self.update_hover(world));
        }
        actions
    }

    pub fn on_pointer_up(&mut self, _screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::DraggingComponent { id, orig_center, .. } => {
                let moved = self.scene.component(&id).is_some_and(|c| c.center() != orig_center);
                if moved {
                    actions.extend(self.commit());
                }
            }
            InputState::ResizingComponent { id, orig_size } => {
                let resized = self.scene.component(&id).is_some_and(|c| (c.width, c.height) != orig_size);
                if resized {
                    actions.extend(self.commit());
                }
            }
            InputState::DrawingTrace => {
                let change = self.scene.commit_trace();
                actions.extend(self.apply(change));
                actions.push(Action::RenderNeeded);
            }
            // The second smart-draw click, not the release, finishes the trace.
            smart @ InputState::SmartDrawing { .. } => self.input = smart,
            InputState::Idle | InputState::Panning { .. } | InputState::SelectingRect { .. } => {}
        }
        self.push_cursor(&mut actions);
        actions
    }

    /// Wheel zooms; the offset stays fixed.
    pub fn on_wheel(&mut self, _screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        self.viewport.zoom_by_wheel(delta.dy);
        vec![self.viewport_action()]
    }

    // =========================================================================
    // KEYBOARD
    // =========================================================================

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let chord = modifiers.ctrl || modifiers.meta;
        let mut actions = if key.is_space() && self.ui.tool != Tool::Pan {
            self.ui.space_pan = true;
            Vec::new()
        } else if key.is("Escape") {
            self.escape()
        } else if key.is("Delete") || key.is("Backspace") {
            self.delete_selected()
        } else if chord && key.is_char('a') {
            self.select_all()
        } else if chord && key.is_char('z') && !modifiers.shift {
            self.undo()
        } else if chord && (key.is_char('y') || (modifiers.shift && key.is_char('z'))) {
            self.redo()
        } else if chord && key.is_char('s') {
            self.save()
        } else if modifiers.shift && (key.is("+") || key.is("=")) {
            self.resize_target(SIZE_INCREMENT)
        } else if modifiers.shift && (key.is("-") || key.is("_")) {
            self.resize_target(-SIZE_INCREMENT)
        } else if !modifiers.any_chord()
            && let Some(tool) = Tool::from_shortcut(&key.0)
        {
            return self.set_tool(tool);
        } else {
            Vec::new()
        };
        self.push_cursor(&mut actions);
        actions
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if key.is_space() && self.ui.tool != Tool::Pan {
            self.ui.space_pan = false;
            if matches!(self.input, InputState::Panning { .. }) {
                self.input = InputState::Idle;
            }
        }
        self.push_cursor(&mut actions);
        actions
    }

    /// Cancel any gesture and clear the selection.
    fn escape(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        self.scene.clear_selection();
        self.ui.context_target = None;
        self.context_trace = None;
        actions.push(self.selection_action());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abandon the active gesture, restoring live edits that were never committed.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        let change = match std::mem::take(&mut self.input) {
            InputState::DrawingTrace | InputState::SmartDrawing { .. } => self.scene.cancel_trace(),
            InputState::ResizingComponent { id, orig_size: (w, h) } => self.scene.set_component_size(&id, w, h),
            InputState::DraggingComponent { id, orig_center, .. } => self.scene.move_component(&id, orig_center),
            InputState::Idle | InputState::Panning { .. } | InputState::SelectingRect { .. } => Change::None,
        };
        if change.is_none() { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    // =========================================================================
    // EDIT COMMANDS
    // =========================================================================

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let change = self.scene.delete_selected();
        if change.is_none() {
            return Vec::new();
        }
        let mut actions = self.apply(change);
        actions.push(self.selection_action());
        actions
    }

    /// Delete the context-menu target: a component, else a trace.
    pub fn delete_target(&mut self) -> Vec<Action> {
        let change = if let Some(id) = self.ui.context_target.take() {
            self.scene.delete_component(&id)
        } else if let Some(id) = self.context_trace.take() {
            self.scene.delete_trace(&id)
        } else {
            Change::None
        };
        self.apply(change)
    }

    pub fn select_all(&mut self) -> Vec<Action> {
        self.scene.select_all();
        vec![self.selection_action(), Action::RenderNeeded]
    }

    pub fn resize_target(&mut self, delta: f64) -> Vec<Action> {
        let Some(id) = self.ui.context_target else {
            return Vec::new();
        };
        let change = self.scene.resize_component(&id, delta);
        self.apply(change)
    }

    pub fn rotate_target(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.context_target else {
            return Vec::new();
        };
        let change = self.scene.rotate_component(&id);
        self.apply(change)
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.step_history(true)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.step_history(false)
    }

    /// Any gesture in progress is abandoned first, even when history cannot move.
    fn step_history(&mut self, back: bool) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        self.push_cursor(&mut actions);
        let moved = if back { self.history.undo(&mut self.scene) } else { self.history.redo(&mut self.scene) };
        if !moved {
            return actions;
        }
        self.ui.context_target = None;
        self.context_trace = None;
        self.pins.ensure_all(self.pin_source.as_ref(), self.scene.components());
        actions.retain(|a| *a != Action::RenderNeeded);
        actions.extend([self.scene_action(), self.selection_action(), self.history_action(), Action::RenderNeeded]);
        actions
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Manual save. Runs regardless of the autosave toggle.
    pub fn save(&mut self) -> Vec<Action> {
        let now = (self.clock)();
        let ok = self.history.save(&self.scene, &self.viewport, self.store.as_mut(), now);
        vec![Action::SaveStatus { status: SaveStatus::Saving }, Self::save_action(ok, now)]
    }

    /// Timer-driven save. Silent when autosave is off.
    pub fn autosave_tick(&mut self) -> Vec<Action> {
        let now = (self.clock)();
        self.history
            .autosave_tick(&self.scene, &self.viewport, self.store.as_mut(), now)
            .map(|ok| vec![Self::save_action(ok, now)])
            .unwrap_or_default()
    }

    pub fn set_autosave(&mut self, enabled: bool, interval_secs: u64) -> Vec<Action> {
        self.history.settings = AutosaveSettings::new(enabled, interval_secs);
        let settings = self.history.settings;
        info!(enabled = settings.enabled, interval_secs = settings.interval_secs, "autosave settings changed");
        vec![Action::AutosaveChanged { enabled: settings.enabled, interval_secs: settings.interval_secs }]
    }

    /// Empty the canvas, reset the view and wipe saved state.
    pub fn clear_all(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let change = self.scene.clear_scene();
        debug!(?change, "scene cleared");
        self.viewport = Viewport::default();
        self.ui.context_target = None;
        self.context_trace = None;
        self.history.record(&self.scene, (self.clock)());
        self.history.forget_saved(self.store.as_mut());
        info!("canvas cleared");
        actions.extend([
            self.scene_action(),
            self.selection_action(),
            self.viewport_action(),
            self.history_action(),
            Action::RenderNeeded,
        ]);
        actions
    }

    /// Load saved state at session start. A corrupt blob is logged and ignored.
    pub fn restore(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        match read_state(self.store.as_ref()) {
            LoadedState::Empty => debug!("no saved canvas state"),
            LoadedState::Corrupt(e) => warn!(error = %e, "saved canvas state is unreadable; starting empty"),
            LoadedState::Found { state, last_saved } => {
                self.scene.restore(&state.snapshot());
                self.viewport = state.viewport();
                self.history.set_last_saved(last_saved);
                self.pins.ensure_all(self.pin_source.as_ref(), self.scene.components());
                info!(
                    components = state.components.len(),
                    traces = state.traces.len(),
                    "restored saved canvas state"
                );
                actions.extend([self.scene_action(), self.viewport_action(), Action::RenderNeeded]);
            }
        }
        if self.history.last_saved().is_none() && !self.scene.is_empty() {
            actions.extend(self.autosave_tick());
        }
        actions
    }

    // =========================================================================
    // PINS / EXPORT
    // =========================================================================

    /// Forget cached pin lookups and re-resolve for the placed components.
    pub fn reload_pins(&mut self, kind: Option<&str>) -> Vec<Action> {
        match kind {
            Some(kind) => self.pins.invalidate(kind),
            None => self.pins.invalidate_all(),
        }
        self.pins.ensure_all(self.pin_source.as_ref(), self.scene.components());
        vec![Action::RenderNeeded]
    }

    /// Nearest pin to `world` within the snap radius.
    #[must_use]
    pub fn nearest_pin(&self, world: Point) -> Option<PinMatch> {
        find_nearest_pin(world, self.scene.components(), &self.pins, SNAP_RADIUS)
    }

    fn snap_to_pin(&self, world: Point) -> Point {
        self.nearest_pin(world).map_or(world, |m| m.world)
    }

    fn update_hover(&mut self, world: Point) -> Vec<Action> {
        let hover = self.nearest_pin(world);
        let same = match (&hover, &self.ui.hover_pin) {
            (Some(a), Some(b)) => a.component_id == b.component_id && a.pin.id == b.pin.id,
            (None, None) => true,
            _ => false,
        };
        if same {
            return Vec::new();
        }
        self.ui.hover_pin.clone_from(&hover);
        vec![Action::PinHover { hover }]
    }

    /// Lay out the current scene for export.
    #[must_use]
    pub fn export(&self, options: &ExportOptions) -> ExportScene {
        let out = build_export(self.scene.components(), self.scene.traces(), options, self.assets.as_ref());
        info!(file = %out.file_name, width = out.width, height = out.height, ops = out.ops.len(), "export prepared");
        out
    }

    // =========================================================================
    // SELECTION / CURSOR
    // =========================================================================

    fn select_in_rect(&self, rect: &Rect) -> Selection {
        Selection {
            traces: self.scene.traces().iter().filter(|t| rect_intersects_trace(rect, t)).map(|t| t.id).collect(),
            components: self
                .scene
                .components()
                .iter()
                .filter(|c| rect_intersects_component(rect, c))
                .map(|c| c.id)
                .collect(),
        }
    }

    /// Cursor for the current tool and gesture. Active gestures take precedence over the tool.
    #[must_use]
    pub fn current_cursor(&self) -> &'static str {
        match (&self.input, self.ui.tool) {
            (InputState::ResizingComponent { .. }, _) => "nwse-resize",
            (InputState::Panning { .. } | InputState::DraggingComponent { .. }, _) => "grabbing",
            _ if self.ui.space_pan || self.ui.tool == Tool::Pan => "grab",
            (InputState::SelectingRect { .. }, Tool::Select) | (_, Tool::Draw) => "crosshair",
            (_, Tool::SmartDraw) => "none",
            _ => "default",
        }
    }

    fn push_cursor(&mut self, actions: &mut Vec<Action>) {
        let cursor = self.current_cursor();
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor { cursor: cursor.to_owned() });
        }
    }
}
