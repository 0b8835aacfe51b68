use std::collections::HashMap;

use super::*;

fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config(&[]).unwrap();
    assert_eq!(cfg.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
    assert_eq!(cfg.pin_dir, None);
    assert_eq!(cfg.asset_dir, None);
    assert_eq!(cfg.autosave, AutosaveSettings::default());
    assert_eq!(cfg.command_queue, DEFAULT_COMMAND_QUEUE);
}

#[test]
fn overrides_are_parsed() {
    let cfg = config(&[
        ("TRACEBOARD_STATE_DIR", "/tmp/tb"),
        ("TRACEBOARD_PIN_DIR", "/srv/pins"),
        ("TRACEBOARD_ASSET_DIR", "/srv/parts"),
        ("TRACEBOARD_AUTOSAVE", "false"),
        ("TRACEBOARD_AUTOSAVE_SECS", "60"),
        ("TRACEBOARD_COMMAND_QUEUE", "16"),
    ])
    .unwrap();
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/tb"));
    assert_eq!(cfg.pin_dir, Some(PathBuf::from("/srv/pins")));
    assert_eq!(cfg.asset_dir, Some(PathBuf::from("/srv/parts")));
    assert_eq!(cfg.autosave, AutosaveSettings { enabled: false, interval_secs: 60 });
    assert_eq!(cfg.command_queue, 16);
}

#[test]
fn autosave_interval_has_a_floor() {
    let cfg = config(&[("TRACEBOARD_AUTOSAVE_SECS", "3")]).unwrap();
    assert_eq!(cfg.autosave.interval_secs, 10);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = config(&[("TRACEBOARD_PIN_DIR", "  "), ("TRACEBOARD_AUTOSAVE", "")]).unwrap();
    assert_eq!(cfg.pin_dir, None);
    assert!(cfg.autosave.enabled);
}

#[test]
fn bad_bool_is_rejected() {
    let err = config(&[("TRACEBOARD_AUTOSAVE", "sometimes")]).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBool { var: "TRACEBOARD_AUTOSAVE", value: "sometimes".into() });
}

#[test]
fn zero_queue_is_rejected() {
    let err = config(&[("TRACEBOARD_COMMAND_QUEUE", "0")]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: "TRACEBOARD_COMMAND_QUEUE", .. }));
}

#[test]
fn non_numeric_interval_is_rejected() {
    assert!(config(&[("TRACEBOARD_AUTOSAVE_SECS", "soon")]).is_err());
}
