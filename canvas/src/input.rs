//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer event.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying all context needed to compute incremental updates and
//! commit the final scene mutation on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::color::Rgb;
use crate::doc::ComponentId;
use crate::hit::PinMatch;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Click to target and drag components (default).
    #[default]
    Pointer,
    /// Drag to pan the view.
    Pan,
    /// Drag a rectangle to select traces and components.
    Select,
    /// Freehand trace drawing.
    Draw,
    /// Two-click orthogonal trace drawing.
    SmartDraw,
}

impl Tool {
    /// Tool bound to a single-letter shortcut, if any.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "p" => Some(Self::Pan),
            "v" => Some(Self::Pointer),
            "s" => Some(Self::Select),
            "d" => Some(Self::Draw),
            "w" => Some(Self::SmartDraw),
            _ => None,
        }
    }

    /// Whether this tool creates traces.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Draw | Self::SmartDraw)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether any of shift, ctrl or meta is held.
    #[must_use]
    pub fn any_select_modifier(self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Whether a shortcut chord (ctrl, alt or meta) is held.
    #[must_use]
    pub fn any_chord(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, named as the host reports it (e.g. `"Delete"`, `"Escape"`, `" "`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    /// Case-insensitive single-character comparison.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }

    #[must_use]
    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "Space"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Color given to newly drawn traces.
    pub trace_color: Rgb,
    /// Component targeted by the last pointer click (resize / rotate / delete target).
    pub context_target: Option<ComponentId>,
    /// Space bar held: pointer drags pan regardless of tool.
    pub space_pan: bool,
    /// Pin under the pointer while a drawing tool is active.
    pub hover_pin: Option<PinMatch>,
    /// Last pointer position in screen space.
    pub last_pointer: Option<Point>,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to compute updates and
/// commit on pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is moving a component.
    DraggingComponent {
        /// Id of the component being dragged.
        id: ComponentId,
        /// Pointer position minus component center at pointer-down, in world units.
        grab_offset: Point,
        /// Center at pointer-down; a release at the same spot records nothing.
        orig_center: Point,
    },
    /// The user is dragging a component's resize handle.
    ResizingComponent {
        /// Id of the component being resized.
        id: ComponentId,
        /// `(width, height)` at pointer-down.
        orig_size: (f64, f64),
    },
    /// The user is dragging a selection rectangle.
    SelectingRect {
        /// Screen-space corner where the drag started.
        start_screen: Point,
    },
    /// The user is drawing a freehand trace.
    DrawingTrace,
    /// The first smart-draw click landed; waiting for the second.
    SmartDrawing {
        /// World-space anchor (pin-snapped when one was close).
        start_world: Point,
    },
}

impl InputState {
    /// Whether a pointer gesture or pending smart-draw is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
