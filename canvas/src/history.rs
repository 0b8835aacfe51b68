//! Snapshot-based undo/redo with best-effort autosave.
//!
//! DESIGN
//! ======
//! History is a fixed-capacity ring of deep scene copies plus a cursor.
//! Pushing truncates everything after the cursor (the redo branch), appends,
//! and evicts the oldest entry once the ring is full, so the cursor always
//! lands on the entry just pushed. The live scene never lives here; undo and
//! redo copy a snapshot back into the [`Scene`].
//!
//! ERROR HANDLING
//! ==============
//! Saves report a boolean. A failed write is logged and leaves the previous
//! last-saved time in place; editing is never interrupted.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::{debug, warn};

use crate::camera::Viewport;
use crate::consts::{DEFAULT_AUTOSAVE_SECS, HISTORY_LIMIT, MIN_AUTOSAVE_SECS};
use crate::doc::{Scene, SceneSnapshot};
use crate::storage::{CANVAS_STATE_KEY, KeyValueStore, LAST_SAVED_KEY, PersistedState, write_state};

// =============================================================================
// RING
// =============================================================================

/// Bounded, cursor-addressed history buffer.
///
/// Logical index 0 is the oldest retained entry. `cursor` is `None` only while
/// the ring is empty.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    slots: Vec<Option<T>>,
    capacity: usize,
    /// Physical slot of logical index 0.
    head: usize,
    len: usize,
    cursor: Option<usize>,
}

impl<T> HistoryRing<T> {
    /// Create an empty ring holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { slots: Vec::with_capacity(capacity), capacity, head: 0, len: 0, cursor: None }
    }

    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.capacity
    }

    /// Drop the redo branch, append `item`, evict the oldest on overflow.
    pub fn push(&mut self, item: T) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        for logical in keep..self.len {
            let phys = self.physical(logical);
            self.slots[phys] = None;
        }
        self.len = keep;

        if self.len == self.capacity {
            let phys = self.head;
            self.slots[phys] = Some(item);
            self.head = (self.head + 1) % self.capacity;
        } else {
            let phys = self.physical(self.len);
            if phys == self.slots.len() {
                self.slots.push(Some(item));
            } else {
                self.slots[phys] = Some(item);
            }
            self.len += 1;
        }
        self.cursor = Some(self.len - 1);
    }

    /// Step back one entry. `None` (and no movement) at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|c| *c > 0)?;
        self.cursor = Some(cursor - 1);
        self.get(cursor - 1)
    }

    /// Step forward one entry. `None` (and no movement) at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        let cursor = self.cursor.filter(|c| c + 1 < self.len)?;
        self.cursor = Some(cursor + 1);
        self.get(cursor + 1)
    }

    /// Entry at logical `index` (0 = oldest retained).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots.get(self.physical(index)).and_then(Option::as_ref)
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.get(c))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cursor position; `None` while empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}

// =============================================================================
// MANAGER
// =============================================================================

/// A committed scene state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub scene: SceneSnapshot,
    pub timestamp: i64,
}

/// Autosave knobs exposed to the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveSettings {
    pub enabled: bool,
    /// Timer period in seconds; never below [`MIN_AUTOSAVE_SECS`].
    pub interval_secs: u64,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self { enabled: true, interval_secs: DEFAULT_AUTOSAVE_SECS }
    }
}

impl AutosaveSettings {
    #[must_use]
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self { enabled, interval_secs: interval_secs.max(MIN_AUTOSAVE_SECS) }
    }
}

/// Undo/redo stack plus save bookkeeping.
#[derive(Debug)]
pub struct HistoryManager {
    ring: HistoryRing<HistorySnapshot>,
    pub settings: AutosaveSettings,
    last_saved: Option<i64>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(AutosaveSettings::default())
    }
}

impl HistoryManager {
    #[must_use]
    pub fn new(settings: AutosaveSettings) -> Self {
        Self { ring: HistoryRing::new(HISTORY_LIMIT), settings, last_saved: None }
    }

    /// Record the scene's current state, then autosave when enabled.
    ///
    /// Returns the save outcome, or `None` when autosave is off.
    pub fn commit(&mut self, scene: &Scene, viewport: &Viewport, store: &mut dyn KeyValueStore, now: i64) -> Option<bool> {
        self.record(scene, now);
        if self.settings.enabled { Some(self.save(scene, viewport, store, now)) } else { None }
    }

    /// Record the scene's current state without saving.
    pub fn record(&mut self, scene: &Scene, now: i64) {
        self.ring.push(HistorySnapshot { scene: scene.snapshot(), timestamp: now });
        debug!(index = ?self.ring.cursor(), len = self.ring.len(), "history commit");
    }

    /// Restore the previous snapshot into `scene`. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(snapshot) = self.ring.undo() else {
            return false;
        };
        scene.restore(&snapshot.scene);
        debug!(index = ?self.ring.cursor(), "undo");
        true
    }

    /// Restore the next snapshot into `scene`. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(snapshot) = self.ring.redo() else {
            return false;
        };
        scene.restore(&snapshot.scene);
        debug!(index = ?self.ring.cursor(), "redo");
        true
    }

    /// Persist the scene and viewport. On success the last-saved time advances to `now`.
    pub fn save(&mut self, scene: &Scene, viewport: &Viewport, store: &mut dyn KeyValueStore, now: i64) -> bool {
        let state = PersistedState::capture(&scene.snapshot(), viewport, now);
        match write_state(store, &state) {
            Ok(()) => {
                self.last_saved = Some(now);
                true
            }
            Err(e) => {
                warn!(error = %e, "canvas save failed");
                false
            }
        }
    }

    /// Timer-driven save. `None` when autosave is disabled.
    pub fn autosave_tick(&mut self, scene: &Scene, viewport: &Viewport, store: &mut dyn KeyValueStore, now: i64) -> Option<bool> {
        if !self.settings.enabled {
            return None;
        }
        Some(self.save(scene, viewport, store, now))
    }

    /// Wipe persisted keys and forget the last-saved time.
    pub fn forget_saved(&mut self, store: &mut dyn KeyValueStore) {
        store.clear(CANVAS_STATE_KEY);
        store.clear(LAST_SAVED_KEY);
        self.last_saved = None;
    }

    /// Seed the last-saved time from storage at session start.
    pub fn set_last_saved(&mut self, at: Option<i64>) {
        self.last_saved = at;
    }

    #[must_use]
    pub fn last_saved(&self) -> Option<i64> {
        self.last_saved
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.ring.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.ring.can_redo()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Cursor position; `None` before the first commit.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.ring.cursor()
    }

    /// Snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.ring.current()
    }
}
