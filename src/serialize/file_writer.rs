//! Deduplicated asset emission into the output's `assets/` directory.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes auxiliary files into the output, deduplicated by destination
/// name.
///
/// The dedup cache is scoped to one serialization run: re-requesting an
/// already-written destination skips the copy and returns the same URL.
#[derive(Debug)]
pub struct FileWriter {
    assets_path: PathBuf,
    base_url: String,
    written: HashSet<String>,
}

impl FileWriter {
    /// A writer targeting the given assets directory, emitting URLs with
    /// the given prefix (ending in `/`).
    pub fn new(assets_path: PathBuf, base_url: String) -> Self {
        Self {
            assets_path,
            base_url,
            written: HashSet::new(),
        }
    }

    /// Copy `source` into the assets directory under `name` (which may
    /// contain subdirectories) and return its output URL.
    pub fn write(&mut self, name: &str, source: &Path) -> Result<String> {
        if self.written.insert(name.to_owned()) {
            let destination = self.assets_path.join(name);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(source, &destination).with_context(|| {
                format!(
                    "Failed to copy asset {} to {}",
                    source.display(),
                    destination.display()
                )
            })?;
        }
        Ok(format!("{}{name}", self.base_url))
    }

    /// Number of distinct assets written so far.
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_copies_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("icon.png");
        fs::write(&source, b"png").unwrap();

        let assets = dir.path().join("out/assets");
        let mut writer = FileWriter::new(assets.clone(), "https://example.org/assets/".to_owned());
        let url = writer.write("icons/icon.png", &source).unwrap();

        assert_eq!(url, "https://example.org/assets/icons/icon.png");
        assert_eq!(fs::read(assets.join("icons/icon.png")).unwrap(), b"png");
    }

    #[test]
    fn test_write_dedups_by_destination_name() {
        let dir = TempDir::new().unwrap();
        let source_a = dir.path().join("a.png");
        let source_b = dir.path().join("b.png");
        fs::write(&source_a, b"first").unwrap();
        fs::write(&source_b, b"second").unwrap();

        let assets = dir.path().join("assets");
        let mut writer = FileWriter::new(assets.clone(), "/assets/".to_owned());
        let url_a = writer.write("icons/icon.png", &source_a).unwrap();
        let url_b = writer.write("icons/icon.png", &source_b).unwrap();

        assert_eq!(url_a, url_b);
        assert_eq!(writer.written_count(), 1);
        // the first write wins; the second is skipped entirely
        assert_eq!(fs::read(assets.join("icons/icon.png")).unwrap(), b"first");
    }

    #[test]
    fn test_write_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let mut writer = FileWriter::new(dir.path().join("assets"), "/assets/".to_owned());
        assert!(writer.write("icon.png", Path::new("/nonexistent.png")).is_err());
    }
}
