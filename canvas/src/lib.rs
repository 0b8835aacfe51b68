//! Scene engine for an infinite-canvas circuit diagram editor.
//!
//! Users place part images on a pannable, zoomable grid and connect their
//! pins with orthogonal traces. This crate owns everything behind the
//! pixels: coordinate conversion, hit-testing, trace routing, the scene
//! itself, undo/redo with autosave, and the persisted format. It performs no
//! I/O of its own; storage, pin definitions and image assets are reached
//! through traits the host implements.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Command dispatch and the gesture state machine ([`engine::EngineCore`]) |
//! | [`bus`] | Inbound [`bus::Command`] vocabulary |
//! | [`doc`] | Components, traces, selection and the live [`doc::Scene`] |
//! | [`camera`] | Viewport transforms, grid snapping, rotation-aware pin placement |
//! | [`input`] | Tools, modifiers and gesture state |
//! | [`hit`] | Pin snapping, picking, rectangle selection, scene bounds |
//! | [`pins`] | Pin types, authored definitions and the per-type cache |
//! | [`route`] | Orthogonal smart-draw routing |
//! | [`history`] | Bounded undo/redo ring and save bookkeeping |
//! | [`storage`] | Key-value persistence of the scene and viewport |
//! | [`export`] | Image export layout as backend-neutral draw ops |
//! | [`color`] | Hex color parsing |
//! | [`consts`] | Shared numeric constants (grid, size limits, zoom, history) |

pub mod bus;
pub mod camera;
pub mod color;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod history;
pub mod input;
pub mod pins;
pub mod route;
pub mod storage;
