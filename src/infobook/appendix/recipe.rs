//! Recipe registry loading and lookup shared by the recipe appendix
//! handlers.
//!
//! Registries are generated metadata files: one JSON file per recipe
//! type, named after the recipe type id with `:` replaced by `__`.
//! Lookups resolve an exact recipe id, a tag-prefixed id (`tag:...`), or
//! a glob pattern containing `*` which collects every matching entry.

use crate::infobook::Item;
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// One recipe record from a generated registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Output identifier this recipe is registered under
    pub id: String,
    /// Input slots in row-major order; each slot lists acceptable
    /// alternative items, any one of which satisfies the slot
    #[serde(default)]
    pub input: Vec<Vec<Item>>,
    /// Output item stack
    pub output: Item,
    /// Declared grid width; absent for shapeless recipes
    #[serde(default)]
    pub width: Option<usize>,
    /// Declared grid height; absent for shapeless recipes
    #[serde(default)]
    pub height: Option<usize>,
    /// Tags this recipe is additionally indexed under
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct RecipeRegistryFile {
    recipes: Vec<Recipe>,
}

/// Read-only recipe lookup table for one recipe type.
///
/// Built once at handler construction and optionally patched by
/// user-supplied overrides, shallowly merged per recipe id.
#[derive(Debug)]
pub struct RecipeRegistry {
    registry_id: String,
    index: BTreeMap<String, Vec<Recipe>>,
}

impl RecipeRegistry {
    /// Load the registry for `registry_id` from a generated metadata
    /// file under `registries_path`.
    pub fn load(
        registry_id: &str,
        registries_path: &Path,
        overrides: Option<&HashMap<String, Vec<Recipe>>>,
    ) -> Result<Self> {
        let file_name = format!("{}.json", registry_id.replace(':', "__"));
        let path = registries_path.join(file_name);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read recipe registry: {}", path.display()))?;
        let file: RecipeRegistryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse recipe registry: {}", path.display()))?;
        Ok(Self::from_recipes(registry_id, file.recipes, overrides))
    }

    /// Build a registry from in-memory recipe records.
    pub fn from_recipes(
        registry_id: &str,
        recipes: Vec<Recipe>,
        overrides: Option<&HashMap<String, Vec<Recipe>>>,
    ) -> Self {
        let mut index: BTreeMap<String, Vec<Recipe>> = BTreeMap::new();
        for recipe in recipes {
            for tag in &recipe.tags {
                index
                    .entry(format!("tag:{tag}"))
                    .or_default()
                    .push(recipe.clone());
            }
            index.entry(recipe.id.clone()).or_default().push(recipe);
        }
        if let Some(overrides) = overrides {
            for (id, recipes) in overrides {
                index.insert(id.clone(), recipes.clone());
            }
        }
        Self {
            registry_id: registry_id.to_owned(),
            index,
        }
    }

    /// Resolve a recipe identifier to one or more recipes.
    ///
    /// Identifiers containing `*` are glob patterns matched against all
    /// registry keys, collecting every match (the selection index is not
    /// applied). Otherwise the identifier is looked up exactly and
    /// `selection` picks among multiple recipes sharing it.
    pub fn find(&self, recipe_id: &str, selection: usize) -> Result<Vec<&Recipe>> {
        if recipe_id.contains('*') {
            let pattern = wildcard_regex(recipe_id)?;
            let recipes: Vec<&Recipe> = self
                .index
                .iter()
                .filter(|(key, _)| pattern.is_match(key))
                .flat_map(|(_, recipes)| recipes)
                .collect();
            if recipes.is_empty() {
                return Err(self.missing(recipe_id));
            }
            return Ok(recipes);
        }

        let recipes = self.index.get(recipe_id).ok_or_else(|| self.missing(recipe_id))?;
        let recipe = recipes.get(selection).ok_or_else(|| {
            anyhow!(
                "Could not find recipe {selection} for {recipe_id} that only has {} recipes.",
                recipes.len()
            )
        })?;
        Ok(vec![recipe])
    }

    fn missing(&self, recipe_id: &str) -> anyhow::Error {
        anyhow!("Could not find any {} recipe for {recipe_id}", self.registry_id)
    }
}

/// Compile a glob pattern into a regex, treating `*` as the only
/// metacharacter; everything else is matched literally.
fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern).replace("\\*", ".*");
    Regex::new(&format!("^{escaped}$")).context("Invalid wildcard recipe pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, output: &str) -> Recipe {
        Recipe {
            id: id.to_owned(),
            input: vec![],
            output: Item::of(output),
            width: None,
            height: None,
            tags: vec![],
        }
    }

    fn registry() -> RecipeRegistry {
        let mut tagged = recipe("examplemod:gear_wood", "examplemod:gear_wood");
        tagged.tags.push("examplemod:gears".to_owned());
        RecipeRegistry::from_recipes(
            "minecraft:crafting",
            vec![
                recipe("examplemod:example_block", "examplemod:example_block"),
                recipe("examplemod:example_block", "examplemod:example_block"),
                tagged,
            ],
            None,
        )
    }

    #[test]
    fn test_find_exact() {
        let registry = registry();
        let recipes = registry.find("examplemod:example_block", 0).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "examplemod:example_block");
    }

    #[test]
    fn test_find_missing_names_identifier() {
        let registry = registry();
        let err = registry.find("examplemod:missing", 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find any minecraft:crafting recipe for examplemod:missing"
        );
    }

    #[test]
    fn test_find_index_out_of_range() {
        let registry = registry();
        let err = registry.find("examplemod:example_block", 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find recipe 5 for examplemod:example_block that only has 2 recipes."
        );
    }

    #[test]
    fn test_find_by_tag() {
        let registry = registry();
        let recipes = registry.find("tag:examplemod:gears", 0).unwrap();
        assert_eq!(recipes[0].id, "examplemod:gear_wood");
    }

    #[test]
    fn test_find_wildcard_collects_all_matches() {
        let registry = registry();
        let recipes = registry.find("examplemod:*", 0).unwrap();
        // two example_block entries plus gear_wood
        assert_eq!(recipes.len(), 3);
    }

    #[test]
    fn test_wildcard_escapes_other_metacharacters() {
        let registry = RecipeRegistry::from_recipes(
            "minecraft:crafting",
            vec![recipe("examplemod:a.b", "examplemod:a.b")],
            None,
        );
        // a literal dot must not act as a regex wildcard
        assert!(registry.find("examplemod:a?b*", 0).is_err());
        assert_eq!(registry.find("examplemod:a.b*", 0).unwrap().len(), 1);
    }

    #[test]
    fn test_overrides_replace_loaded_entries() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "examplemod:example_block".to_owned(),
            vec![recipe("examplemod:example_block", "examplemod:patched")],
        );
        let registry = RecipeRegistry::from_recipes(
            "minecraft:crafting",
            vec![
                recipe("examplemod:example_block", "examplemod:example_block"),
                recipe("examplemod:example_block", "examplemod:example_block"),
            ],
            Some(&overrides),
        );
        let recipes = registry.find("examplemod:example_block", 0).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].output.item, "examplemod:patched");
    }
}
