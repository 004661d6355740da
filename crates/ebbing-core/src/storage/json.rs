//! JSON file Item Store

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ItemStore, Result};
use crate::item::TrackableItem;

/// Collection stored as one JSON array
///
/// A missing file loads as an empty collection. Saves go through a
/// sibling temp file and a rename so a crash never leaves half a file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ItemStore for JsonStore {
    fn load(&self) -> Result<Vec<TrackableItem>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No item file yet");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<TrackableItem> = serde_json::from_str(&content)?;
        tracing::debug!(count = items.len(), path = %self.path.display(), "Loaded items");
        Ok(items)
    }

    fn save(&self, items: &[TrackableItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        {
            let mut file = std::fs::File::create(&temp)?;
            serde_json::to_writer_pretty(&mut file, items)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        std::fs::rename(&temp, &self.path)?;
        tracing::debug!(count = items.len(), path = %self.path.display(), "Saved items");
        Ok(())
    }
}
