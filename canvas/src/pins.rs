//! Pin definitions: types, authored definitions, synthetic fallbacks, and the per-type cache.
//!
//! Pins are read-only data keyed by component type. Coordinates are in the
//! component's unrotated asset space (origin top-left); see
//! [`crate::camera::pin_local_to_world`] for the world transform.
//!
//! Resolution order for a type:
//! 1. an authored definition from the host's [`PinSource`] (VIA annotation JSON),
//! 2. otherwise a deterministic synthetic layout derived from the type name.
//!
//! Authored lookups are cached per type and only re-fetched after
//! [`PinCache::invalidate`]. Synthetic layouts depend on the component's
//! footprint and are recomputed on demand.

#[cfg(test)]
#[path = "pins_test.rs"]
mod pins_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::camera::unrotated_footprint;
use crate::color::Rgb;
use crate::consts::PIN_REFERENCE_SIZE;
use crate::doc::Component;

/// Electrical role of a pin. Drives highlight color only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    Power,
    Ground,
    Digital,
    Analog,
    Signal,
    Communication,
}

impl PinKind {
    /// Highlight color for this pin kind.
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            Self::Power => Rgb::new(0xff, 0x44, 0x44),
            Self::Ground => Rgb::new(0x00, 0xd3, 0x2e),
            Self::Digital => Rgb::new(0x00, 0x99, 0xff),
            Self::Analog => Rgb::new(0xfc, 0xff, 0x44),
            Self::Signal => Rgb::new(0xba, 0x44, 0xff),
            Self::Communication => Rgb::new(0x44, 0xff, 0xff),
        }
    }

    /// Guess a pin's role from its label. First matching rule wins.
    #[must_use]
    pub fn infer_from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |needle: &str| name.contains(needle);
        if has("v") || has("power") || has("vin") || has("5v") || has("3.3v") {
            Self::Power
        } else if has("gnd") || has("ground") {
            Self::Ground
        } else if has("a") || has("analog") {
            Self::Analog
        } else if has("sda") || has("scl") || has("i2c") || has("rx") || has("tx") {
            Self::Communication
        } else if name.chars().any(|c| c.is_ascii_digit()) || name == "data" {
            Self::Digital
        } else {
            Self::Signal
        }
    }
}

/// A named connection point on a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PinKind,
    pub local_x: f64,
    pub local_y: f64,
    pub description: String,
}

impl Pin {
    fn new(id: impl Into<String>, kind: PinKind, local_x: f64, local_y: f64, description: impl Into<String>) -> Self {
        Self { id: id.into(), kind, local_x, local_y, description: description.into() }
    }
}

/// An authored pin layout for one component type.
#[derive(Debug, Clone, PartialEq)]
pub struct PinDefinition {
    /// Normalized component type.
    pub kind: String,
    /// Human-readable name derived from the type.
    pub name: String,
    /// Asset width the pins were scaled to.
    pub width: f64,
    /// Asset height the pins were scaled to.
    pub height: f64,
    pub pins: Vec<Pin>,
}

/// Errors reading an authored pin definition.
#[derive(Debug, thiserror::Error)]
pub enum PinDefinitionError {
    #[error("invalid pin definition JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no image entry found in pin definition")]
    MissingImageEntry,
    #[error("pin definition entry has no regions")]
    NoRegions,
    #[error("pin definition source failed: {0}")]
    Source(String),
}

/// Normalize a component type for definition lookup: lowercase, whitespace runs to `-`.
#[must_use]
pub fn normalize_type(kind: &str) -> String {
    kind.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}

// =============================================================================
// SYNTHETIC LAYOUTS
// =============================================================================

/// Deterministic pin layout for a type with no authored definition.
#[must_use]
pub fn synthetic_pins(kind: &str, width: f64, height: f64) -> Vec<Pin> {
    let lower = kind.to_lowercase();
    if ["arduino", "uno", "nano"].iter().any(|k| lower.contains(k)) {
        return board_header_pins(width, height);
    }
    if lower.contains("sensor") || lower.contains("module") {
        return sensor_pins(width, height);
    }
    vec![
        Pin::new("PIN1", PinKind::Signal, width * 0.25, height / 2.0, "Pin 1"),
        Pin::new("PIN2", PinKind::Signal, width * 0.75, height / 2.0, "Pin 2"),
    ]
}

/// Two 14-pin headers down the left and right edges.
fn board_header_pins(width: f64, height: f64) -> Vec<Pin> {
    const PER_SIDE: u32 = 14;
    let spacing = height / f64::from(PER_SIDE + 1);
    let mut pins = Vec::with_capacity(2 * PER_SIDE as usize);
    for i in 0..PER_SIDE {
        let kind = match i {
            0 | 1 => PinKind::Power,
            2 | 3 => PinKind::Ground,
            _ => PinKind::Digital,
        };
        let n = i + 1;
        pins.push(Pin::new(format!("L{n}"), kind, width * 0.1, spacing * f64::from(n), format!("Left Pin {n}")));
    }
    for i in 0..PER_SIDE {
        let n = i + 1;
        pins.push(Pin::new(
            format!("R{n}"),
            PinKind::Digital,
            width * 0.9,
            spacing * f64::from(n),
            format!("Right Pin {n}"),
        ));
    }
    pins
}

/// Four pins stacked down the vertical center line.
fn sensor_pins(width: f64, height: f64) -> Vec<Pin> {
    const COUNT: u32 = 4;
    let spacing = height / f64::from(COUNT + 1);
    (0..COUNT)
        .map(|i| {
            let kind = match i {
                0 => PinKind::Power,
                1 => PinKind::Ground,
                _ => PinKind::Signal,
            };
            let n = i + 1;
            Pin::new(format!("P{n}"), kind, width / 2.0, spacing * f64::from(n), format!("Pin {n}"))
        })
        .collect()
}

// =============================================================================
// AUTHORED DEFINITIONS (VIA annotation format)
// =============================================================================

/// Parse a VIA annotation export into a pin definition.
///
/// `image_size` is the real asset size; annotation coordinates are authored
/// against a 1080×1080 reference and scaled per axis. When the asset size is
/// unknown the reference size is assumed.
///
/// # Errors
///
/// Returns an error when no `.png` entry exists or the entry has no regions.
pub fn parse_via_definition(data: &Value, image_size: Option<(f64, f64)>) -> Result<PinDefinition, PinDefinitionError> {
    let Some(obj) = data.as_object() else {
        return Err(PinDefinitionError::MissingImageEntry);
    };
    let filename_hint = obj.get("filename").and_then(Value::as_str);
    let Some((key, entry)) = obj
        .iter()
        .find(|(k, _)| k.contains(".png") || filename_hint.is_some_and(|f| k.contains(f)))
    else {
        return Err(PinDefinitionError::MissingImageEntry);
    };
    let Some(regions) = entry.get("regions").and_then(Value::as_array) else {
        return Err(PinDefinitionError::NoRegions);
    };

    let file_name = entry
        .get("filename")
        .and_then(Value::as_str)
        .map_or_else(|| key.split(".png").next().unwrap_or(key).to_owned(), str::to_owned);
    let file_name = file_name.strip_suffix(".png").unwrap_or(&file_name);
    let kind: String = file_name
        .replace('_', "-")
        .replace(['(', ')'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    let (width, height) = image_size.unwrap_or((PIN_REFERENCE_SIZE, PIN_REFERENCE_SIZE));
    let scale_x = width / PIN_REFERENCE_SIZE;
    let scale_y = height / PIN_REFERENCE_SIZE;

    let pins = regions
        .iter()
        .filter_map(|region| {
            let shape = region.get("shape_attributes")?;
            if shape.get("name").and_then(Value::as_str) == Some("rect") {
                return None;
            }
            let cx = shape.get("cx").and_then(Value::as_f64)?;
            let cy = shape.get("cy").and_then(Value::as_f64)?;
            let name = region_pin_name(region);
            Some(Pin::new(
                name.split_whitespace().collect::<Vec<_>>().join("_").to_uppercase(),
                PinKind::infer_from_name(&name),
                cx * scale_x,
                cy * scale_y,
                format!("{name} pin"),
            ))
        })
        .collect();

    Ok(PinDefinition { name: kind.replace('-', " ").to_uppercase(), kind, width, height, pins })
}

/// The pin label from `region_attributes.pin_names`: a string, or the first key of an object.
fn region_pin_name(region: &Value) -> String {
    match region.get("region_attributes").and_then(|a| a.get("pin_names")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => map.keys().next().cloned().unwrap_or_else(|| "unknown".to_owned()),
        _ => "unknown".to_owned(),
    }
}

// =============================================================================
// SOURCE + CACHE
// =============================================================================

/// Where authored pin definitions come from (filesystem, bundle, network).
pub trait PinSource {
    /// Look up the definition for a normalized type. `Ok(None)` means "not authored".
    ///
    /// # Errors
    ///
    /// Returns an error when a definition exists but cannot be read or parsed.
    fn load(&self, kind: &str) -> Result<Option<PinDefinition>, PinDefinitionError>;
}

/// A source with no authored definitions; every type resolves synthetically.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticOnly;

impl PinSource for SyntheticOnly {
    fn load(&self, _kind: &str) -> Result<Option<PinDefinition>, PinDefinitionError> {
        Ok(None)
    }
}

/// Read access to a component's resolved pins.
pub trait PinLookup {
    fn pins_for(&self, component: &Component) -> Vec<Pin>;
}

/// Per-type cache of authored pin lookups.
///
/// `None` entries record "no authored definition" so the source is not asked again.
#[derive(Debug, Default)]
pub struct PinCache {
    authored: HashMap<String, Option<Vec<Pin>>>,
}

impl PinCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `kind` has been looked up in `source`. Load failures fall back to synthetic pins.
    pub fn ensure(&mut self, source: &dyn PinSource, kind: &str) {
        let key = normalize_type(kind);
        if self.authored.contains_key(&key) {
            return;
        }
        let pins = match source.load(&key) {
            Ok(Some(def)) => {
                debug!(kind = %key, count = def.pins.len(), "loaded authored pin definition");
                Some(def.pins)
            }
            Ok(None) => {
                debug!(kind = %key, "no authored pin definition; using synthetic layout");
                None
            }
            Err(e) => {
                debug!(kind = %key, error = %e, "pin definition failed to load; using synthetic layout");
                None
            }
        };
        self.authored.insert(key, pins);
    }

    /// Ensure every component's type has been looked up.
    pub fn ensure_all(&mut self, source: &dyn PinSource, components: &[Component]) {
        for c in components {
            self.ensure(source, &c.kind);
        }
    }

    /// Forget one type so the next lookup re-reads its source.
    pub fn invalidate(&mut self, kind: &str) {
        self.authored.remove(&normalize_type(kind));
    }

    /// Forget every cached type.
    pub fn invalidate_all(&mut self) {
        self.authored.clear();
    }

    /// Whether `kind` has been looked up.
    #[must_use]
    pub fn is_cached(&self, kind: &str) -> bool {
        self.authored.contains_key(&normalize_type(kind))
    }
}

impl PinLookup for PinCache {
    fn pins_for(&self, component: &Component) -> Vec<Pin> {
        if let Some(Some(pins)) = self.authored.get(&normalize_type(&component.kind)) {
            return pins.clone();
        }
        let (w, h) = unrotated_footprint(component);
        synthetic_pins(&component.kind, w, h)
    }
}
