//! Infobook configuration loaded from a JSON file.
//!
//! # Fields
//!
//! | Field               | Purpose                                          |
//! |---------------------|--------------------------------------------------|
//! | `modId`             | Identifier of the mod owning the book            |
//! | `title`             | Site title shown on every page                   |
//! | `baseDir`           | Directory that `sectionsFile` is relative to     |
//! | `sectionsFile`      | Root XML document of the book                    |
//! | `resources`         | Resource pack directories to scan for assets     |
//! | `baseUrl`           | Absolute URL prefix of the published site        |
//! | `colors`            | Color theme values, keyed by role                |
//! | `keybindings`       | Keybinding id to key label                       |
//! | `sectionInjections` | Target section key to injected sub-books         |
//! | `recipeOverrides`   | Per-registry recipe patches                      |
//! | `googleAdsense`     | Optional ad-network settings                     |
//! | `wikiBaseUrl`       | External wiki used for built-in game content     |

mod error;

pub use error::ConfigError;

use crate::infobook::appendix::recipe::Recipe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Default external wiki for `minecraft`-namespaced content.
pub const DEFAULT_WIKI_BASE_URL: &str = "https://minecraft.wiki/w/";

/// Root configuration structure representing the infobook config JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookConfig {
    /// Identifier of the mod owning this book
    #[serde(default)]
    pub mod_id: String,

    /// Site title
    #[serde(default)]
    pub title: String,

    /// Base directory that other content paths are relative to
    #[serde(default)]
    pub base_dir: PathBuf,

    /// Root XML sections document, relative to `base_dir`
    #[serde(default)]
    pub sections_file: PathBuf,

    /// Resource pack directories to scan, relative to `base_dir`
    #[serde(default)]
    pub resources: Vec<PathBuf>,

    /// Absolute URL prefix of the published site, ending in `/`
    #[serde(default)]
    pub base_url: String,

    /// Color theme values, keyed by role (e.g. `main`, `background`)
    #[serde(default)]
    pub colors: HashMap<String, String>,

    /// Keybinding id to configured key label
    #[serde(default)]
    pub keybindings: HashMap<String, String>,

    /// Section translation key to externally-authored sub-books that
    /// should be injected under it
    #[serde(default)]
    pub section_injections: HashMap<String, Vec<SectionInjection>>,

    /// Recipe registry patches, keyed by registry id then recipe id
    #[serde(default)]
    pub recipe_overrides: HashMap<String, HashMap<String, Vec<Recipe>>>,

    /// Optional ad-network settings; when present, leaf pages carry an ad
    #[serde(default)]
    pub google_adsense: Option<AdsenseConfig>,

    /// External wiki URL prefix for built-in game content
    #[serde(default)]
    pub wiki_base_url: Option<String>,
}

/// One externally-authored sub-book to inject into a target section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionInjection {
    /// Root XML document of the sub-book, relative to `base_dir`
    pub sections_file: PathBuf,
    /// Identifier of the mod owning the sub-book
    pub mod_id: String,
}

/// Ad-network settings for the ad appendix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsenseConfig {
    pub client: String,
    pub slot: String,
}

impl BookConfig {
    /// Parse configuration from a JSON string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: BookConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// External wiki URL prefix for built-in game content
    pub fn wiki_base_url(&self) -> &str {
        self.wiki_base_url.as_deref().unwrap_or(DEFAULT_WIKI_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_str_minimal() {
        let config = BookConfig::from_str(
            r#"{
                "modId": "examplemod",
                "title": "Example Book",
                "baseDir": "book",
                "sectionsFile": "sections.xml",
                "baseUrl": "https://example.org/book/"
            }"#,
        )
        .unwrap();
        assert_eq!(config.mod_id, "examplemod");
        assert_eq!(config.sections_file, PathBuf::from("sections.xml"));
        assert!(config.section_injections.is_empty());
        assert!(config.google_adsense.is_none());
        assert_eq!(config.wiki_base_url(), DEFAULT_WIKI_BASE_URL);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(BookConfig::from_str(r#"{"modid": "wrong-case"}"#).is_err());
    }

    #[test]
    fn test_config_injections_and_ads() {
        let config = BookConfig::from_str(
            r#"{
                "modId": "examplemod",
                "sectionInjections": {
                    "info_book.examplemod.section.main": [
                        {"sectionsFile": "addon.xml", "modId": "exampleaddon"}
                    ]
                },
                "googleAdsense": {"client": "ca-pub-1", "slot": "2"}
            }"#,
        )
        .unwrap();
        let injections = &config.section_injections["info_book.examplemod.section.main"];
        assert_eq!(injections.len(), 1);
        assert_eq!(injections[0].mod_id, "exampleaddon");
        assert_eq!(config.google_adsense.unwrap().slot, "2");
    }
}
