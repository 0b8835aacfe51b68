//! Editor session task: the single owner of the engine.
//!
//! DESIGN
//! ======
//! One tokio task owns the [`EngineCore`] and `select!`s between the bounded
//! command channel and the autosave interval. Commands and ticks are handled
//! to completion one at a time, so the engine needs no locking. The interval
//! is rebuilt whenever an `AutosaveChanged` action reports a new period.
//!
//! The task ends when every command sender is dropped or the action receiver
//! goes away, and hands the engine back through its join handle.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use canvas::bus::Command;
use canvas::engine::{Action, EngineCore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info};

/// Handle to a running session.
pub struct Session {
    pub commands: mpsc::Sender<Command>,
    pub task: JoinHandle<EngineCore>,
}

/// Spawn the session task. Saved state is restored before the first command is read.
pub fn spawn_session(engine: EngineCore, queue_capacity: usize, actions: mpsc::Sender<Action>) -> Session {
    let (commands, rx) = mpsc::channel(queue_capacity.max(1));
    let task = tokio::spawn(run_session(engine, rx, actions));
    Session { commands, task }
}

async fn run_session(mut engine: EngineCore, mut commands: mpsc::Receiver<Command>, actions: mpsc::Sender<Action>) -> EngineCore {
    let restored = engine.dispatch(Command::Restore);
    if !forward(&actions, restored).await {
        return engine;
    }

    let mut ticker = autosave_ticker(engine.history.settings.interval_secs);
    info!(
        autosave = engine.history.settings.enabled,
        interval_secs = engine.history.settings.interval_secs,
        "session started"
    );

    loop {
        let out = tokio::select! {
            cmd = commands.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                let out = engine.dispatch(cmd);
                if let Some(secs) = new_interval(&out) {
                    debug!(interval_secs = secs, "autosave interval rebuilt");
                    ticker = autosave_ticker(secs);
                }
                out
            }
            _ = ticker.tick() => engine.dispatch(Command::AutosaveTick),
        };
        if !forward(&actions, out).await {
            break;
        }
    }

    info!(components = engine.scene.components().len(), traces = engine.scene.traces().len(), "session closed");
    engine
}

/// Send every action downstream. `false` once the receiver is gone.
async fn forward(tx: &mpsc::Sender<Action>, actions: Vec<Action>) -> bool {
    for action in actions {
        if tx.send(action).await.is_err() {
            debug!("action receiver dropped");
            return false;
        }
    }
    true
}

fn new_interval(actions: &[Action]) -> Option<u64> {
    actions.iter().find_map(|a| match a {
        Action::AutosaveChanged { interval_secs, .. } => Some(*interval_secs),
        _ => None,
    })
}

/// Interval whose first tick is one full period away.
fn autosave_ticker(secs: u64) -> Interval {
    let period = Duration::from_secs(secs.max(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
