use canvas::camera::{Point, Viewport};
use canvas::doc::{Component, Scene};
use canvas::engine::SaveStatus;
use canvas::pins::SyntheticOnly;
use canvas::storage::{CANVAS_STATE_KEY, KeyValueStore, MemoryStore, PersistedState};

use super::*;

const NOW: i64 = 1_700_000_000_000;

fn clock() -> i64 {
    NOW
}

fn engine_with(store: MemoryStore) -> EngineCore {
    EngineCore::new(Box::new(store), Box::new(SyntheticOnly)).with_clock(clock)
}

fn place_cmd() -> Command {
    Command::PlacePart {
        kind: "led".into(),
        name: "LED".into(),
        image_ref: "led.png".into(),
        at: Point::new(0.0, 0.0),
        size: None,
    }
}

/// Receive until `pred` matches, failing after ten virtual minutes.
async fn recv_until(rx: &mut mpsc::Receiver<Action>, pred: impl Fn(&Action) -> bool) -> Action {
    loop {
        let action = tokio::time::timeout(Duration::from_secs(600), rx.recv()).await.unwrap().unwrap();
        if pred(&action) {
            return action;
        }
    }
}

fn is_saved(action: &Action) -> bool {
    matches!(action, Action::SaveStatus { status: SaveStatus::Saved { .. } })
}

#[tokio::test(start_paused = true)]
async fn restore_runs_before_commands() {
    let mut scene = Scene::new();
    scene.place_component(Component::new("led", "LED", "led.png", Point::new(0.0, 0.0), None));
    let blob = serde_json::to_string(&PersistedState::capture(&scene.snapshot(), &Viewport::default(), 1)).unwrap();
    let mut store = MemoryStore::new();
    store.set(CANVAS_STATE_KEY, &blob).unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let session = spawn_session(engine_with(store), 8, tx);

    assert_eq!(rx.recv().await.unwrap(), Action::SceneChanged { components: 1, traces: 0 });
    let saved = recv_until(&mut rx, |a| matches!(a, Action::SaveStatus { .. })).await;
    assert_eq!(saved, Action::SaveStatus { status: SaveStatus::Saved { at: NOW } });

    drop(session.commands);
    let engine = session.task.await.unwrap();
    assert_eq!(engine.scene.components().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn commands_are_applied_in_order() {
    let (tx, mut rx) = mpsc::channel(64);
    let session = spawn_session(engine_with(MemoryStore::new()), 8, tx);

    session.commands.send(place_cmd()).await.unwrap();
    session.commands.send(place_cmd()).await.unwrap();
    session.commands.send(Command::Undo).await.unwrap();
    drop(session.commands);

    let engine = session.task.await.unwrap();
    assert_eq!(engine.scene.components().len(), 1);
    assert!(engine.history.can_redo());

    let mut scene_counts = Vec::new();
    while let Some(action) = rx.recv().await {
        if let Action::SceneChanged { components, .. } = action {
            scene_counts.push(components);
        }
    }
    assert_eq!(scene_counts, vec![1, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn autosave_interval_fires_periodically() {
    let (tx, mut rx) = mpsc::channel(64);
    let engine = engine_with(MemoryStore::new()).with_autosave(canvas::history::AutosaveSettings::new(true, 10));
    let session = spawn_session(engine, 8, tx);

    session.commands.send(place_cmd()).await.unwrap();
    recv_until(&mut rx, is_saved).await;

    let start = Instant::now();
    recv_until(&mut rx, is_saved).await;
    assert!(start.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn disabling_autosave_silences_ticks() {
    let (tx, mut rx) = mpsc::channel(64);
    let session = spawn_session(engine_with(MemoryStore::new()), 8, tx);

    session.commands.send(Command::SetAutosave { enabled: false, interval_secs: 10 }).await.unwrap();
    let changed = recv_until(&mut rx, |a| matches!(a, Action::AutosaveChanged { .. })).await;
    assert_eq!(changed, Action::AutosaveChanged { enabled: false, interval_secs: 10 });

    let quiet = tokio::time::timeout(Duration::from_secs(120), rx.recv()).await;
    assert!(quiet.is_err());
}

#[tokio::test(start_paused = true)]
async fn dropped_action_receiver_ends_session() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let session = spawn_session(engine_with(MemoryStore::new()), 8, tx);
    session.commands.send(place_cmd()).await.unwrap_or_default();
    let engine = session.task.await.unwrap();
    assert!(engine.history.len() <= 1);
}

#[test]
fn interval_change_is_detected() {
    let actions = vec![Action::RenderNeeded, Action::AutosaveChanged { enabled: true, interval_secs: 40 }];
    assert_eq!(new_interval(&actions), Some(40));
    assert_eq!(new_interval(&[Action::RenderNeeded]), None);
}
