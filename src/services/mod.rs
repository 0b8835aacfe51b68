//! Host services around the canvas engine.
//!
//! - `session`: the task that owns the engine and the autosave timer
//! - `stdio`: JSON-lines command/action transport
//! - `store`: file-backed key-value persistence
//! - `pins`: directory-backed pin definitions
//! - `assets`: part image availability for export

pub mod assets;
pub mod pins;
pub mod session;
pub mod stdio;
pub mod store;
