//! Inbound command vocabulary.
//!
//! Every user intent the UI layer can express arrives as one [`Command`].
//! The host decodes commands from its transport (JSON lines, IPC, tests) and
//! hands them to [`crate::engine::EngineCore::dispatch`], which answers with
//! [`crate::engine::Action`]s. Nothing is broadcast ambiently: tool, color
//! and save triggers travel the same channel as pointer events.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::color::Rgb;
use crate::export::ExportOptions;
use crate::input::{Button, Key, Modifiers, Tool, WheelDelta};

/// A user intent addressed to the engine. Screen coordinates are viewport pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetTool {
        tool: Tool,
    },
    SetTraceColor {
        color: Rgb,
    },
    /// Drop a part from the palette at a screen position.
    PlacePart {
        kind: String,
        name: String,
        image_ref: String,
        at: Point,
        /// Intrinsic asset size, when the host knows it.
        #[serde(default)]
        size: Option<(f64, f64)>,
    },
    PointerDown {
        at: Point,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        at: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        at: Point,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        at: Point,
        delta: WheelDelta,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DeleteSelected,
    /// Delete whatever the context menu targets (a component or a trace).
    DeleteTarget,
    SelectAll,
    ClearSelection,
    Undo,
    Redo,
    /// Grow or shrink the targeted component by `delta` world units.
    ResizeTarget {
        delta: f64,
    },
    RotateTarget,
    Save,
    ClearAll,
    SetAutosave {
        enabled: bool,
        interval_secs: u64,
    },
    Export {
        #[serde(default)]
        options: ExportOptions,
    },
    /// Periodic autosave timer fired.
    AutosaveTick,
    /// Load saved state; sent once at session start.
    Restore,
    /// Drop cached pin lookups for one type, or all of them.
    ReloadPins {
        #[serde(default)]
        kind: Option<String>,
    },
}
