use super::*;
use crate::camera::Point;
use crate::doc::Component;
use crate::storage::{LoadedState, MemoryStore, read_state};

fn place(scene: &mut Scene, x: f64) {
    let c = Component::new("led", "LED", "led.png", Point::new(x, 0.0), None);
    assert!(scene.place_component(c).is_commit());
}

fn manual() -> HistoryManager {
    HistoryManager::new(AutosaveSettings::new(false, 30))
}

// =============================================================
// Ring
// =============================================================

#[test]
fn ring_starts_empty() {
    let ring: HistoryRing<u32> = HistoryRing::new(3);
    assert!(ring.is_empty());
    assert_eq!(ring.cursor(), None);
    assert!(!ring.can_undo());
    assert!(!ring.can_redo());
}

#[test]
fn ring_evicts_oldest_when_full() {
    let mut ring = HistoryRing::new(3);
    for i in 0..5 {
        ring.push(i);
    }
    assert_eq!(ring.len(), 3);
    assert_eq!(ring.get(0), Some(&2));
    assert_eq!(ring.current(), Some(&4));
}

#[test]
fn ring_push_truncates_redo_branch() {
    let mut ring = HistoryRing::new(5);
    for i in 0..4 {
        ring.push(i);
    }
    assert_eq!(ring.undo(), Some(&2));
    assert_eq!(ring.undo(), Some(&1));
    ring.push(9);
    assert_eq!(ring.len(), 3);
    assert!(!ring.can_redo());
    assert_eq!(ring.current(), Some(&9));
}

#[test]
fn ring_truncate_after_wraparound() {
    let mut ring = HistoryRing::new(3);
    for i in 0..5 {
        ring.push(i);
    }
    assert_eq!(ring.undo(), Some(&3));
    ring.push(7);
    assert_eq!(ring.len(), 3);
    assert_eq!((ring.get(0), ring.get(1), ring.get(2)), (Some(&2), Some(&3), Some(&7)));
}

#[test]
fn ring_undo_stops_at_oldest() {
    let mut ring = HistoryRing::new(3);
    ring.push('a');
    assert_eq!(ring.undo(), None);
    assert_eq!(ring.cursor(), Some(0));
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut ring = HistoryRing::new(0);
    ring.push(1);
    ring.push(2);
    assert_eq!(ring.capacity(), 1);
    assert_eq!(ring.current(), Some(&2));
}

// =============================================================
// Manager
// =============================================================

#[test]
fn sixty_commits_keep_fifty() {
    let mut scene = Scene::new();
    let mut history = manual();
    let mut store = MemoryStore::new();
    for i in 0..60 {
        place(&mut scene, f64::from(i) * 10.0);
        assert_eq!(history.commit(&scene, &Viewport::default(), &mut store, i64::from(i)), None);
    }
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.index(), Some(HISTORY_LIMIT - 1));

    let mut undos = 0;
    while history.undo(&mut scene) {
        undos += 1;
    }
    assert_eq!(undos, HISTORY_LIMIT - 1);
    // Oldest retained entry is commit #10, holding 11 components.
    assert_eq!(scene.components().len(), 11);
}

#[test]
fn undo_redo_restores_scene() {
    let mut scene = Scene::new();
    let mut history = manual();
    let mut store = MemoryStore::new();
    let vp = Viewport::default();

    place(&mut scene, 0.0);
    assert_eq!(history.commit(&scene, &vp, &mut store, 1), None);
    place(&mut scene, 100.0);
    assert_eq!(history.commit(&scene, &vp, &mut store, 2), None);

    assert!(history.undo(&mut scene));
    assert_eq!(scene.components().len(), 1);
    assert!(history.redo(&mut scene));
    assert_eq!(scene.components().len(), 2);
    assert!(!history.redo(&mut scene));
}

#[test]
fn undo_with_single_entry_does_nothing() {
    let mut scene = Scene::new();
    let mut history = manual();
    place(&mut scene, 0.0);
    assert_eq!(history.commit(&scene, &Viewport::default(), &mut MemoryStore::new(), 1), None);
    assert!(!history.can_undo());
    assert!(!history.undo(&mut scene));
    assert_eq!(scene.components().len(), 1);
}

#[test]
fn new_commit_after_undo_discards_redo() {
    let mut scene = Scene::new();
    let mut history = manual();
    let mut store = MemoryStore::new();
    let vp = Viewport::default();
    for i in 0..3 {
        place(&mut scene, f64::from(i) * 10.0);
        assert_eq!(history.commit(&scene, &vp, &mut store, 0), None);
    }
    assert!(history.undo(&mut scene));
    assert!(history.can_redo());
    place(&mut scene, 500.0);
    assert_eq!(history.commit(&scene, &vp, &mut store, 0), None);
    assert!(!history.can_redo());
    assert_eq!(history.len(), 3);
}

#[test]
fn commit_autosaves_when_enabled() {
    let mut scene = Scene::new();
    let mut history = HistoryManager::default();
    let mut store = MemoryStore::new();
    place(&mut scene, 0.0);
    assert_eq!(history.commit(&scene, &Viewport::default(), &mut store, 42), Some(true));
    assert_eq!(history.last_saved(), Some(42));
    let LoadedState::Found { state, last_saved } = read_state(&store) else {
        panic!("expected saved state");
    };
    assert_eq!(state.components.len(), 1);
    assert_eq!(last_saved, Some(42));
}

#[test]
fn failed_save_keeps_previous_timestamp() {
    let scene = Scene::new();
    let mut history = HistoryManager::default();
    let mut store = MemoryStore::new();
    assert!(history.save(&scene, &Viewport::default(), &mut store, 10));
    store.fail_writes = true;
    assert!(!history.save(&scene, &Viewport::default(), &mut store, 20));
    assert_eq!(history.last_saved(), Some(10));
}

#[test]
fn autosave_tick_respects_toggle() {
    let scene = Scene::new();
    let mut store = MemoryStore::new();
    let mut history = manual();
    assert_eq!(history.autosave_tick(&scene, &Viewport::default(), &mut store, 5), None);
    assert!(store.is_empty());
    history.settings.enabled = true;
    assert_eq!(history.autosave_tick(&scene, &Viewport::default(), &mut store, 5), Some(true));
}

#[test]
fn forget_saved_clears_keys() {
    let scene = Scene::new();
    let mut store = MemoryStore::new();
    let mut history = HistoryManager::default();
    assert!(history.save(&scene, &Viewport::default(), &mut store, 1));
    history.forget_saved(&mut store);
    assert!(store.is_empty());
    assert_eq!(history.last_saved(), None);
}

#[test]
fn autosave_interval_has_floor() {
    assert_eq!(AutosaveSettings::new(true, 3).interval_secs, MIN_AUTOSAVE_SECS);
    assert_eq!(AutosaveSettings::new(true, 60).interval_secs, 60);
    assert_eq!(AutosaveSettings::default().interval_secs, DEFAULT_AUTOSAVE_SECS);
}
