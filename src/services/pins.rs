//! Directory-backed pin definitions: `<dir>/<type>.json` in VIA annotation format.
//!
//! Annotations are authored against a 1080×1080 reference. When an asset
//! directory is configured, `<assets>/<type>.png` supplies the real image size
//! the pins are scaled to.

#[cfg(test)]
#[path = "pins_test.rs"]
mod pins_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use canvas::pins::{PinDefinition, PinDefinitionError, PinSource, parse_via_definition};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct DirPinSource {
    dir: PathBuf,
    asset_dir: Option<PathBuf>,
}

impl DirPinSource {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf(), asset_dir: None }
    }

    /// Read part image sizes from `asset_dir`.
    #[must_use]
    pub fn with_assets(mut self, asset_dir: &Path) -> Self {
        self.asset_dir = Some(asset_dir.to_path_buf());
        self
    }

    fn path_for(&self, kind: &str) -> PathBuf {
        self.dir.join(format!("{kind}.json"))
    }

    /// Pixel size of `<assets>/<kind>.png`, if it exists and has a readable header.
    fn image_size(&self, kind: &str) -> Option<(f64, f64)> {
        let path = self.asset_dir.as_ref()?.join(format!("{kind}.png"));
        if !path.is_file() {
            return None;
        }
        match image::image_dimensions(&path) {
            Ok((w, h)) => Some((f64::from(w), f64::from(h))),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable part image; assuming reference size");
                None
            }
        }
    }
}

impl PinSource for DirPinSource {
    fn load(&self, kind: &str) -> Result<Option<PinDefinition>, PinDefinitionError> {
        if kind.contains(['/', '\\']) || kind.starts_with('.') {
            return Ok(None);
        }
        let path = self.path_for(kind);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PinDefinitionError::Source(format!("{}: {e}", path.display()))),
        };
        let data: Value = serde_json::from_str(&raw)?;
        parse_via_definition(&data, self.image_size(kind)).map(Some)
    }
}
