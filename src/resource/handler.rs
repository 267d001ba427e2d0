//! In-memory lookup store for harvested game resources.

use crate::infobook::Item;
use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Language whose translations serve as the fallback table and whose
/// pages occupy the output root.
pub const DEFAULT_LANGUAGE: &str = "en_us";

/// Key of the item icon and translation-key stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    namespace: String,
    path: String,
    meta: i32,
}

impl ItemKey {
    fn of(item: &Item) -> Self {
        Self {
            namespace: item.namespace().to_owned(),
            path: item.path().to_owned(),
            meta: item.data,
        }
    }
}

/// An advancement's display data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Advancement {
    /// Item shown as the advancement's icon
    pub item_icon: Item,
    /// Translation key of the title
    pub title: String,
    /// Translation key of the description
    pub description: String,
}

/// Allows harvested game resources to be looked up.
///
/// Translations and icons merge/overwrite on re-insertion; advancements
/// and keybindings are write-once per id.
#[derive(Debug, Default)]
pub struct ResourceHandler {
    translations: HashMap<String, HashMap<String, String>>,
    item_icons: HashMap<ItemKey, BTreeMap<String, PathBuf>>,
    item_translation_keys: HashMap<ItemKey, BTreeMap<String, String>>,
    fluid_icons: HashMap<String, PathBuf>,
    fluid_translation_keys: HashMap<String, String>,
    advancements: HashMap<String, Advancement>,
    keybindings: HashMap<String, String>,
    resource_pack_base_paths: HashMap<String, PathBuf>,
}

impl ResourceHandler {
    /// A handler preloaded with the hardcoded default translations.
    pub fn new() -> Self {
        let mut handler = Self::default();
        let defaults = [
            ("block.minecraft.crafting_table", "Crafting Table"),
            ("block.minecraft.furnace", "Furnace"),
            ("gui.advancements", "Advancements"),
        ];
        handler.add_translations(
            DEFAULT_LANGUAGE,
            defaults
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        );
        handler
    }

    /// All available language keys, sorted, default language first.
    pub fn get_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.translations.keys().map(String::as_str).collect();
        languages.sort_unstable_by_key(|language| (*language != DEFAULT_LANGUAGE, *language));
        languages
    }

    /// Add translations for the given language, merging with existing
    /// entries (later values overwrite).
    pub fn add_translations(&mut self, language: &str, translations: HashMap<String, String>) {
        self.translations
            .entry(language.to_owned())
            .or_default()
            .extend(translations);
    }

    /// Get the translation for the given key, falling back to the
    /// default language table.
    pub fn get_translation(&self, translation_key: &str, language: &str) -> Result<&str> {
        self.translations
            .get(language)
            .and_then(|entries| entries.get(translation_key))
            .or_else(|| {
                self.translations
                    .get(DEFAULT_LANGUAGE)
                    .and_then(|entries| entries.get(translation_key))
            })
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow!("Could not find translation key {translation_key} in {language}")
            })
    }

    pub fn add_item_icon(
        &mut self,
        namespace: &str,
        path: &str,
        meta: i32,
        nbt: &str,
        icon_file: PathBuf,
    ) {
        self.item_icons
            .entry(ItemKey {
                namespace: namespace.to_owned(),
                path: path.to_owned(),
                meta,
            })
            .or_default()
            .insert(nbt.to_owned(), icon_file);
    }

    /// Get the icon file for an item, falling back to the first
    /// available entry when no exact NBT match exists.
    pub fn get_item_icon_file(&self, item: &Item) -> Option<&Path> {
        let entries = self.item_icons.get(&ItemKey::of(item))?;
        entries
            .get(&item.nbt)
            .or_else(|| entries.values().next())
            .map(PathBuf::as_path)
    }

    pub fn add_item_translation_key(&mut self, item: &Item, translation_key: &str) {
        self.item_translation_keys
            .entry(ItemKey::of(item))
            .or_default()
            .insert(item.nbt.clone(), translation_key.to_owned());
    }

    /// Get the translation key for an item, with the same NBT fallback
    /// as icon lookup.
    pub fn get_item_translation_key(&self, item: &Item) -> Option<&str> {
        let entries = self.item_translation_keys.get(&ItemKey::of(item))?;
        entries
            .get(&item.nbt)
            .or_else(|| entries.values().next())
            .map(String::as_str)
    }

    pub fn add_fluid_icon(&mut self, fluid: &str, icon_file: PathBuf) {
        self.fluid_icons.insert(fluid.to_owned(), icon_file);
    }

    pub fn get_fluid_icon_file(&self, fluid: &str) -> Option<&Path> {
        self.fluid_icons.get(fluid).map(PathBuf::as_path)
    }

    pub fn add_fluid_translation_key(&mut self, fluid: &str, translation_key: &str) {
        self.fluid_translation_keys
            .insert(fluid.to_owned(), translation_key.to_owned());
    }

    pub fn get_fluid_translation_key(&self, fluid: &str) -> Option<&str> {
        self.fluid_translation_keys.get(fluid).map(String::as_str)
    }

    /// Register an advancement under an id. Re-adding an id is a
    /// construction error.
    pub fn add_advancement(&mut self, id: &str, advancement: Advancement) -> Result<()> {
        if self.advancements.contains_key(id) {
            bail!("An advancement with id '{id}' is already registered");
        }
        self.advancements.insert(id.to_owned(), advancement);
        Ok(())
    }

    pub fn get_advancement(&self, id: &str) -> Result<&Advancement> {
        self.advancements
            .get(id)
            .ok_or_else(|| anyhow!("Could not find advancement with id '{id}'"))
    }

    /// Register a keybinding label under an id. Re-adding an id is a
    /// construction error.
    pub fn add_keybinding(&mut self, id: &str, key: &str) -> Result<()> {
        if self.keybindings.contains_key(id) {
            bail!("A keybinding with id '{id}' is already registered");
        }
        self.keybindings.insert(id.to_owned(), key.to_owned());
        Ok(())
    }

    pub fn get_keybinding(&self, id: &str) -> Result<&str> {
        self.keybindings
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Could not find keybinding with id '{id}'"))
    }

    /// Remember where a mod's resource pack lives, for resolving
    /// mod-relative resource paths.
    pub fn set_resource_pack_base_path(&mut self, mod_id: &str, base_path: PathBuf) {
        self.resource_pack_base_paths
            .insert(mod_id.to_owned(), base_path);
    }

    /// Resolve a mod-relative resource path such as
    /// `examplemod:images/diagram.png` to an absolute file path.
    pub fn expand_resource_path(&self, resource_path: &str) -> Result<PathBuf> {
        let (mod_id, relative) = resource_path
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid resource path '{resource_path}', expected mod:path"))?;
        let base = self.resource_pack_base_paths.get(mod_id).ok_or_else(|| {
            anyhow!("No resource pack base path registered for mod '{mod_id}'")
        })?;
        Ok(base.join(relative))
    }
}
