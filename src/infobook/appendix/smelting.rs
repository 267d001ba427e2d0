//! Smelting (furnace) recipe appendices.

use super::recipe::{Recipe, RecipeRegistry};
use super::{Appendix, AppendixHandler};
use crate::infobook::Item;
use crate::parse::XmlNode;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Recipe type id of the smelting registry file.
pub const REGISTRY_ID: &str = "minecraft:smelting";

/// Handles smelting recipe appendices.
pub struct AppendixHandlerSmeltingRecipe {
    registry: RecipeRegistry,
}

impl AppendixHandlerSmeltingRecipe {
    pub fn new(
        registries_path: &Path,
        overrides: Option<&HashMap<String, Vec<Recipe>>>,
    ) -> Result<Self> {
        Ok(Self {
            registry: RecipeRegistry::load(REGISTRY_ID, registries_path, overrides)?,
        })
    }
}

impl AppendixHandler for AppendixHandlerSmeltingRecipe {
    fn create_appendix(&self, data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
        let recipe_id = data.text.trim();
        let selection = match data.attribute("index") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid recipe index attribute '{raw}'"))?,
            None => 0,
        };
        let recipes = self
            .registry
            .find(recipe_id, selection)?
            .into_iter()
            .cloned()
            .collect();
        Ok(Box::new(SmeltingRecipeAppendix { recipes }))
    }
}

struct SmeltingRecipeAppendix {
    recipes: Vec<Recipe>,
}

impl Appendix for SmeltingRecipeAppendix {
    fn name(&self, ctx: &SerializeContext<'_>) -> Result<Option<String>> {
        Ok(Some(ctx.translate_formatted("block.minecraft.furnace")?))
    }

    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        let rendered: Vec<String> = self
            .recipes
            .iter()
            .map(|recipe| serialize_recipe(recipe, ctx, files, serializer))
            .collect::<Result<_>>()?;
        Ok(rendered.join("<hr />"))
    }
}

fn serialize_recipe(
    recipe: &Recipe,
    ctx: &SerializeContext<'_>,
    files: &mut FileWriter,
    serializer: &HtmlInfoBookSerializer,
) -> Result<String> {
    // All accepted inputs render stacked in the single input slot.
    let mut input = String::new();
    for item in recipe.input.iter().flatten() {
        input.push_str(&serializer.create_item_display(ctx, files, item, true, "")?);
    }
    let output = serializer.create_item_display(ctx, files, &recipe.output, true, "")?;
    let appendix_icon =
        serializer.create_item_display(ctx, files, &Item::of("minecraft:furnace"), false, "")?;
    Ok(templates::furnace_recipe(&input, &output, &appendix_icon))
}
