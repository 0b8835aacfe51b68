//! Persistence boundary: the key-value store contract and the saved-state shape.
//!
//! The engine treats storage as opaque `get`/`set`/`clear` on string keys.
//! Writes are best-effort: callers log failures and carry on editing.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::camera::{Point, Viewport};
use crate::consts::DEFAULT_COMPONENT_SIZE;
use crate::doc::{Component, SceneSnapshot, Trace, clamp_size};

/// Key of the serialized scene + viewport blob.
pub const CANVAS_STATE_KEY: &str = "canvas-state";

/// Key of the last successful save time (ms since epoch).
pub const LAST_SAVED_KEY: &str = "last-saved";

/// Error returned by [`KeyValueStore::set`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend rejected write: {0}")]
    Backend(String),
}

/// Durable string key-value storage supplied by the host.
pub trait KeyValueStore {
    /// Read a value; `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend refuses the write (quota, I/O).
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value if present.
    fn clear(&mut self, key: &str);
}

/// In-process store, optionally configured to reject writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    /// When set, every `set` fails with a backend error.
    pub fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Backend("quota exceeded".to_owned()));
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Saved scene plus the viewport it was viewed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub traces: Vec<Trace>,
    #[serde(default)]
    pub offset: Point,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub timestamp: i64,
}

fn default_scale() -> f64 {
    1.0
}

fn saved_size(v: f64) -> f64 {
    if v.is_finite() { clamp_size(v) } else { DEFAULT_COMPONENT_SIZE }
}

impl PersistedState {
    /// Capture a snapshot and viewport at `timestamp`.
    #[must_use]
    pub fn capture(snapshot: &SceneSnapshot, viewport: &Viewport, timestamp: i64) -> Self {
        Self {
            components: snapshot.components.clone(),
            traces: snapshot.traces.clone(),
            offset: Point::new(viewport.offset_x, viewport.offset_y),
            scale: viewport.scale,
            timestamp,
        }
    }

    /// The scene half of the saved state.
    ///
    /// Sizes are clamped into the component range and traces with fewer
    /// than two points are dropped, so a hand-edited blob cannot break the
    /// scene invariants.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        let components = self
            .components
            .iter()
            .cloned()
            .map(|mut c| {
                c.width = saved_size(c.width);
                c.height = saved_size(c.height);
                c
            })
            .collect();
        let traces = self.traces.iter().filter(|t| t.points.len() >= 2).cloned().collect();
        SceneSnapshot { components, traces }
    }

    /// The viewport half of the saved state. Non-positive scales fall back to 1.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let scale = if self.scale.is_finite() && self.scale > 0.0 { self.scale } else { 1.0 };
        Viewport { scale, offset_x: self.offset.x, offset_y: self.offset.y }
    }
}

/// Write `state` and the last-saved stamp.
///
/// # Errors
///
/// Returns the first serialization or backend failure; on failure the
/// last-saved key is not touched.
pub fn write_state(store: &mut dyn KeyValueStore, state: &PersistedState) -> Result<(), StorageError> {
    let blob = serde_json::to_string(state)?;
    store.set(CANVAS_STATE_KEY, &blob)?;
    store.set(LAST_SAVED_KEY, &state.timestamp.to_string())?;
    Ok(())
}

/// Outcome of reading saved state at session start.
#[derive(Debug)]
pub enum LoadedState {
    /// Nothing saved yet.
    Empty,
    /// A valid saved state and its last-saved stamp (if readable).
    Found { state: PersistedState, last_saved: Option<i64> },
    /// A blob exists but could not be decoded.
    Corrupt(serde_json::Error),
}

/// Read the saved state, if any.
#[must_use]
pub fn read_state(store: &dyn KeyValueStore) -> LoadedState {
    let Some(blob) = store.get(CANVAS_STATE_KEY) else {
        return LoadedState::Empty;
    };
    match serde_json::from_str::<PersistedState>(&blob) {
        Ok(state) => {
            let last_saved = store.get(LAST_SAVED_KEY).and_then(|v| parse_timestamp(&v));
            LoadedState::Found { state, last_saved }
        }
        Err(e) => LoadedState::Corrupt(e),
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    let Ok(ts) = raw.trim().parse::<i64>() else {
        return None;
    };
    Some(ts)
}

/// Wall-clock milliseconds since the Unix epoch; 0 if the clock is before the epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
