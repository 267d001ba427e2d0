//! Populates a [`ResourceHandler`] from harvested game metadata.
//!
//! Consumes the outputs of the external data-harvesting step: an icon
//! directory with a delimited filename convention, translation-key
//! registries, resource packs with line-oriented language files, and
//! advancement JSON trees.

use super::handler::{Advancement, ResourceHandler};
use crate::infobook::Item;
use crate::log;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemTranslationKeyEntry {
    item: Item,
    translation_key: String,
}

#[derive(Deserialize)]
struct ItemTranslationKeysFile {
    items: Vec<ItemTranslationKeyEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FluidTranslationKeyEntry {
    fluid: String,
    translation_key: String,
}

#[derive(Deserialize)]
struct FluidTranslationKeysFile {
    fluids: Vec<FluidTranslationKeyEntry>,
}

#[derive(Deserialize)]
struct AdvancementFile {
    display: AdvancementDisplay,
}

#[derive(Deserialize)]
struct AdvancementDisplay {
    icon: Item,
    title: Translatable,
    description: Translatable,
}

#[derive(Deserialize)]
struct Translatable {
    translate: String,
}

/// Loads game resources in-memory.
#[derive(Debug, Default)]
pub struct ResourceLoader {
    handler: ResourceHandler,
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self {
            handler: ResourceHandler::new(),
        }
    }

    /// Consume the loader, yielding the populated handler.
    pub fn into_handler(self) -> ResourceHandler {
        self.handler
    }

    /// Load all icon files from the given directory.
    ///
    /// Item icons are named `namespace__path__meta[__nbt...].png`; fluid
    /// icons are named `fluid__name.png`.
    pub fn load_icons(&mut self, icons_path: &Path) -> Result<()> {
        let entries = fs::read_dir(icons_path)
            .with_context(|| format!("Failed to read icons directory: {}", icons_path.display()))?;
        let mut count = 0usize;
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".png") else {
                continue;
            };

            if let Some(fluid) = stem.strip_prefix("fluid__") {
                self.handler.add_fluid_icon(fluid, entry.path());
            } else {
                let parts: Vec<&str> = stem.split("__").collect();
                if parts.len() < 3 {
                    return Err(anyhow!("Invalid icon file name '{name}'"));
                }
                let meta: i32 = parts[2]
                    .parse()
                    .with_context(|| format!("Invalid icon meta in file name '{name}'"))?;
                // NBT components use ':' internally, which the filename
                // convention flattens to '__'.
                let nbt = parts[3..].join(":");
                self.handler
                    .add_item_icon(parts[0], parts[1], meta, &nbt, entry.path());
            }
            count += 1;
        }
        log!("resources"; "loaded {count} icons");
        Ok(())
    }

    /// Load item translation keys from `item_translation_keys.json`.
    pub fn load_item_translation_keys(&mut self, registries_path: &Path) -> Result<()> {
        let path = registries_path.join("item_translation_keys.json");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read registry: {}", path.display()))?;
        let file: ItemTranslationKeysFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry: {}", path.display()))?;
        for entry in file.items {
            self.handler
                .add_item_translation_key(&entry.item, &entry.translation_key);
        }
        Ok(())
    }

    /// Load fluid translation keys from `fluid_translation_keys.json`.
    pub fn load_fluid_translation_keys(&mut self, registries_path: &Path) -> Result<()> {
        let path = registries_path.join("fluid_translation_keys.json");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read registry: {}", path.display()))?;
        let file: FluidTranslationKeysFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry: {}", path.display()))?;
        for entry in file.fluids {
            self.handler
                .add_fluid_translation_key(&entry.fluid, &entry.translation_key);
        }
        Ok(())
    }

    /// Load the given configured keybindings.
    pub fn load_keybindings(&mut self, keybindings: &HashMap<String, String>) -> Result<()> {
        for (id, key) in keybindings {
            self.handler.add_keybinding(id, key)?;
        }
        Ok(())
    }

    /// Load all resource packs within the given paths.
    ///
    /// Each direct subdirectory of a resource path is treated as one
    /// mod's resource pack.
    pub fn load_all(&mut self, base_dir: &Path, resource_paths: &[impl AsRef<Path>]) -> Result<()> {
        for resource_path in resource_paths {
            let full_path = base_dir.join(resource_path.as_ref());
            let entries = fs::read_dir(&full_path).with_context(|| {
                format!("Failed to read resources directory: {}", full_path.display())
            })?;
            for entry in entries {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    let mod_id = entry.file_name().to_string_lossy().into_owned();
                    self.load_pack_assets(&mod_id, &entry.path())?;
                }
            }
        }
        Ok(())
    }

    /// Load the assets of one mod's resource pack.
    fn load_pack_assets(&mut self, mod_id: &str, pack_path: &Path) -> Result<()> {
        self.handler
            .set_resource_pack_base_path(mod_id, pack_path.to_path_buf());

        let lang_dir = pack_path.join("lang");
        if lang_dir.is_dir() {
            self.load_lang_dir(&lang_dir)?;
        }

        let advancements_dir = pack_path.join("advancements");
        if advancements_dir.is_dir() {
            self.load_advancements(mod_id, &advancements_dir)?;
        }
        Ok(())
    }

    /// Load every language file within the given directory.
    fn load_lang_dir(&mut self, lang_dir: &Path) -> Result<()> {
        for entry in fs::read_dir(lang_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(language) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read language file: {}", path.display()))?;
            self.handler
                .add_translations(language, parse_lang_file(&content));
        }
        Ok(())
    }

    /// Load the advancement JSON tree within the given directory.
    ///
    /// Advancement ids are `mod_id:relative/path` without the `.json`
    /// extension.
    fn load_advancements(&mut self, mod_id: &str, advancements_dir: &Path) -> Result<()> {
        for entry in WalkDir::new(advancements_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(advancements_dir)?.with_extension("");
            let id = format!(
                "{mod_id}:{}",
                relative.to_string_lossy().replace('\\', "/")
            );

            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read advancement: {}", path.display()))?;
            let file: AdvancementFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse advancement: {}", path.display()))?;
            self.handler.add_advancement(
                &id,
                Advancement {
                    item_icon: file.display.icon,
                    title: file.display.title.translate,
                    description: file.display.description.translate,
                },
            )?;
        }
        Ok(())
    }
}

/// Parse a line-oriented `key=value` language file. Empty lines and
/// lines starting with `#` are skipped.
fn parse_lang_file(content: &str) -> HashMap<String, String> {
    let mut translations = HashMap::new();
    for line in content.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            translations.insert(key.to_owned(), value.to_owned());
        }
    }
    translations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lang_file() {
        let translations = parse_lang_file(
            "# comment\ninfo_book.key=Value\n\ninfo_book.other=A=B\nbroken line\n",
        );
        assert_eq!(translations.len(), 2);
        assert_eq!(translations["info_book.key"], "Value");
        // only the first '=' separates key and value
        assert_eq!(translations["info_book.other"], "A=B");
    }

    #[test]
    fn test_load_icons_items_and_fluids() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("examplemod__example_block__0.png"), b"png").unwrap();
        fs::write(
            dir.path().join("examplemod__example_block__0__{variant__1}.png"),
            b"png",
        )
        .unwrap();
        fs::write(dir.path().join("fluid__menrilresin.png"), b"png").unwrap();
        fs::write(dir.path().join("ignored.txt"), b"x").unwrap();

        let mut loader = ResourceLoader::new();
        loader.load_icons(dir.path()).unwrap();
        let handler = loader.into_handler();

        let item = Item::of("examplemod:example_block");
        assert!(handler.get_item_icon_file(&item).is_some());
        assert!(handler.get_fluid_icon_file("menrilresin").is_some());
        assert!(handler.get_fluid_icon_file("water").is_none());
    }

    #[test]
    fn test_load_icons_invalid_name_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("missing_separators.png"), b"png").unwrap();
        let mut loader = ResourceLoader::new();
        assert!(loader.load_icons(dir.path()).is_err());
    }

    #[test]
    fn test_load_translation_key_registries() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("item_translation_keys.json"),
            r#"{"items": [{"item": {"item": "examplemod:example_block"},
                           "translationKey": "block.examplemod.example_block"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("fluid_translation_keys.json"),
            r#"{"fluids": [{"fluid": "menrilresin",
                            "translationKey": "fluid.examplemod.menrilresin"}]}"#,
        )
        .unwrap();

        let mut loader = ResourceLoader::new();
        loader.load_item_translation_keys(dir.path()).unwrap();
        loader.load_fluid_translation_keys(dir.path()).unwrap();
        let handler = loader.into_handler();

        assert_eq!(
            handler
                .get_item_translation_key(&Item::of("examplemod:example_block"))
                .unwrap(),
            "block.examplemod.example_block"
        );
        assert_eq!(
            handler.get_fluid_translation_key("menrilresin").unwrap(),
            "fluid.examplemod.menrilresin"
        );
    }

    #[test]
    fn test_load_all_packs() {
        let dir = TempDir::new().unwrap();
        let pack = dir.path().join("resources/examplemod");
        fs::create_dir_all(pack.join("lang")).unwrap();
        fs::write(
            pack.join("lang/en_us.lang"),
            "info_book.examplemod.section.main=Example Book\n",
        )
        .unwrap();
        fs::write(pack.join("lang/nl_nl.lang"), "info_book.examplemod.section.main=Voorbeeldboek\n")
            .unwrap();
        fs::create_dir_all(pack.join("advancements/nested")).unwrap();
        fs::write(
            pack.join("advancements/nested/root.json"),
            r#"{"display": {"icon": {"item": "minecraft:book"},
                            "title": {"translate": "adv.title"},
                            "description": {"translate": "adv.desc"}}}"#,
        )
        .unwrap();

        let mut loader = ResourceLoader::new();
        loader
            .load_all(dir.path(), &[Path::new("resources")])
            .unwrap();
        let handler = loader.into_handler();

        assert_eq!(
            handler
                .get_translation("info_book.examplemod.section.main", "nl_nl")
                .unwrap(),
            "Voorbeeldboek"
        );
        let advancement = handler.get_advancement("examplemod:nested/root").unwrap();
        assert_eq!(advancement.title, "adv.title");
        assert!(
            handler
                .expand_resource_path("examplemod:lang/en_us.lang")
                .unwrap()
                .ends_with("resources/examplemod/lang/en_us.lang")
        );
    }
}
