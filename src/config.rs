//! Host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use canvas::consts::DEFAULT_AUTOSAVE_SECS;
use canvas::history::AutosaveSettings;

pub const DEFAULT_STATE_DIR: &str = ".traceboard";
pub const DEFAULT_COMMAND_QUEUE: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be `true` or `false`, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory backing the file key-value store.
    pub state_dir: PathBuf,
    /// Directory of `<type>.json` pin definitions; synthetic pins only when absent.
    pub pin_dir: Option<PathBuf>,
    /// Directory of part images, consulted by export.
    pub asset_dir: Option<PathBuf>,
    pub autosave: AutosaveSettings,
    /// Capacity of the bounded command channel.
    pub command_queue: usize,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `TRACEBOARD_STATE_DIR`: default `.traceboard`
    /// - `TRACEBOARD_PIN_DIR`
    /// - `TRACEBOARD_ASSET_DIR`
    /// - `TRACEBOARD_AUTOSAVE`: `true` (default) or `false`
    /// - `TRACEBOARD_AUTOSAVE_SECS`: default 30, raised to at least 10
    /// - `TRACEBOARD_COMMAND_QUEUE`: default 256
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `get`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable cannot be parsed.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let state_dir = get("TRACEBOARD_STATE_DIR").unwrap_or_else(|| DEFAULT_STATE_DIR.to_string());
        let enabled = parse_bool(&get, "TRACEBOARD_AUTOSAVE", true)?;
        let interval_secs = parse_positive(&get, "TRACEBOARD_AUTOSAVE_SECS", DEFAULT_AUTOSAVE_SECS)?;
        let command_queue = parse_positive(&get, "TRACEBOARD_COMMAND_QUEUE", DEFAULT_COMMAND_QUEUE)?;

        Ok(Self {
            state_dir: PathBuf::from(state_dir),
            pin_dir: non_empty(get("TRACEBOARD_PIN_DIR")).map(PathBuf::from),
            asset_dir: non_empty(get("TRACEBOARD_ASSET_DIR")).map(PathBuf::from),
            autosave: AutosaveSettings::new(enabled, interval_secs),
            command_queue,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(get: &impl Fn(&str) -> Option<String>, var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = non_empty(get(var)) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}

fn parse_positive<T>(get: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = non_empty(get(var)) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}
