//! Part images on disk, consulted by export to choose image draws over placeholders.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::path::{Component, Path, PathBuf};

use canvas::export::AssetCatalog;

#[derive(Debug, Clone)]
pub struct FileAssets {
    dir: PathBuf,
}

impl FileAssets {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl AssetCatalog for FileAssets {
    fn is_available(&self, image_ref: &str) -> bool {
        let rel = Path::new(image_ref);
        // Only plain relative paths inside the asset directory.
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return false;
        }
        self.dir.join(rel).is_file()
    }
}
