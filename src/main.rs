mod config;
mod services;

use std::process::ExitCode;

use canvas::engine::EngineCore;
use canvas::pins::{PinSource, SyntheticOnly};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::services::assets::FileAssets;
use crate::services::pins::DirPinSource;
use crate::services::session::spawn_session;
use crate::services::stdio::{read_commands, write_actions};
use crate::services::store::{FileStore, FileStoreError};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] FileStoreError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the action stream; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "traceboard failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    let store = FileStore::open(&config.state_dir)?;
    info!(
        state_dir = %store.dir().display(),
        pin_dir = ?config.pin_dir,
        autosave = config.autosave.enabled,
        interval_secs = config.autosave.interval_secs,
        "traceboard starting"
    );

    let pins: Box<dyn PinSource + Send> = match &config.pin_dir {
        Some(dir) => {
            let source = DirPinSource::new(dir);
            Box::new(match &config.asset_dir {
                Some(assets) => source.with_assets(assets),
                None => source,
            })
        }
        None => Box::new(SyntheticOnly),
    };
    let mut engine = EngineCore::new(Box::new(store), pins).with_autosave(config.autosave);
    if let Some(dir) = &config.asset_dir {
        engine = engine.with_assets(Box::new(FileAssets::new(dir)));
    }

    let (action_tx, action_rx) = mpsc::channel(config.command_queue);
    let session = spawn_session(engine, config.command_queue, action_tx);
    let writer = tokio::spawn(write_actions(action_rx, tokio::io::stdout()));

    let stats = read_commands(BufReader::new(tokio::io::stdin()), session.commands).await;
    info!(accepted = stats.accepted, rejected = stats.rejected, "input closed");

    match session.task.await {
        Ok(engine) => info!(components = engine.scene.components().len(), "session finished"),
        Err(e) => error!(error = %e, "session task failed"),
    }
    match writer.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(error = %e, "action output failed"),
        Err(e) => error!(error = %e, "action writer task failed"),
    }
    Ok(())
}
