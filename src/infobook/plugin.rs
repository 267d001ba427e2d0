//! Plugin seam for infobook loading.

use super::InfoBookInitializer;
use crate::config::BookConfig;
use crate::resource::ResourceLoader;
use anyhow::Result;
use std::path::PathBuf;

/// A plugin for infobook loading.
///
/// Plugins can register additional appendix handlers, contribute an
/// assets directory copied into the output, and add HTML to every page's
/// `<head>`.
pub trait InfobookPlugin {
    /// An optional assets directory that should be copied to the output.
    fn assets_path(&self) -> Option<PathBuf> {
        None
    }

    /// Load this plugin, typically registering appendix handlers.
    fn load(
        &self,
        initializer: &mut InfoBookInitializer,
        loader: &mut ResourceLoader,
        config: &BookConfig,
    ) -> Result<()>;

    /// An optional string added to every page's `<head>` tag.
    fn head_suffix(&self, _config: &BookConfig, _language: &str) -> String {
        String::new()
    }
}
