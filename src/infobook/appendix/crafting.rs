//! Crafting recipe appendices, normalized to a 3x3 grid.

use super::recipe::{Recipe, RecipeRegistry};
use super::{Appendix, AppendixHandler};
use crate::infobook::Item;
use crate::parse::XmlNode;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Recipe type id of the crafting registry file.
pub const REGISTRY_ID: &str = "minecraft:crafting";

/// Handles crafting recipe appendices.
pub struct AppendixHandlerCraftingRecipe {
    registry: RecipeRegistry,
}

impl AppendixHandlerCraftingRecipe {
    pub fn new(
        registries_path: &Path,
        overrides: Option<&HashMap<String, Vec<Recipe>>>,
    ) -> Result<Self> {
        Ok(Self {
            registry: RecipeRegistry::load(REGISTRY_ID, registries_path, overrides)?,
        })
    }
}

impl AppendixHandler for AppendixHandlerCraftingRecipe {
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
        Ok(Box::new(CraftingRecipeAppendix { recipes }))
    }
}

struct CraftingRecipeAppendix {
    recipes: Vec<Recipe>,
}

impl Appendix for CraftingRecipeAppendix {
    fn name(&self, ctx: &SerializeContext<'_>) -> Result<Option<String>> {
        Ok(Some(ctx.translate_formatted("block.minecraft.crafting_table")?))
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
    let grid = normalize_grid(recipe);
    let mut cells = Vec::with_capacity(9);
    for alternatives in &grid {
        let mut cell = String::new();
        for item in alternatives {
            cell.push_str(&serializer.create_item_display(ctx, files, item, true, "")?);
        }
        cells.push(cell);
    }
    let output = serializer.create_item_display(ctx, files, &recipe.output, true, "")?;
    Ok(templates::crafting_recipe(&cells, &output))
}

/// Normalize a recipe's inputs to a 3x3 grid of alternative lists.
///
/// Shapeless recipes (no declared width/height) are assumed square, with
/// side length the integer square root of the input count. Grid cells
/// outside the declared width x height hold the empty-slot item.
fn normalize_grid(recipe: &Recipe) -> [Vec<Item>; 9] {
    let (width, height) = match (recipe.width, recipe.height) {
        (Some(width), Some(height)) => (width, height),
        _ => {
            let side = recipe.input.len().isqrt();
            (side, side)
        }
    };

    let mut grid: [Vec<Item>; 9] = Default::default();
    for y in 0..3 {
        for x in 0..3 {
            let mut alternatives = if x < width && y < height {
                recipe.input.get(y * width + x).cloned().unwrap_or_default()
            } else {
                Vec::new()
            };
            if alternatives.is_empty() {
                alternatives.push(Item::air());
            }
            grid[y * 3 + x] = alternatives;
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shapeless_recipe(inputs: usize) -> Recipe {
        Recipe {
            id: "examplemod:example_block".to_owned(),
            input: (0..inputs)
                .map(|i| vec![Item::of(format!("minecraft:input_{i}"))])
                .collect(),
            output: Item::of("examplemod:example_block"),
            width: None,
            height: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_shapeless_four_inputs_fill_two_by_two() {
        let grid = normalize_grid(&shapeless_recipe(4));
        // row 0: inputs 0 and 1, then air
        assert_eq!(grid[0][0].item, "minecraft:input_0");
        assert_eq!(grid[1][0].item, "minecraft:input_1");
        assert!(grid[2][0].is_air());
        // row 1: inputs 2 and 3, then air
        assert_eq!(grid[3][0].item, "minecraft:input_2");
        assert_eq!(grid[4][0].item, "minecraft:input_3");
        // everything beyond the 2x2 area is empty
        for cell in &grid[5..] {
            assert_eq!(cell.len(), 1);
            assert!(cell[0].is_air());
        }
    }

    #[test]
    fn test_shaped_recipe_respects_declared_dimensions() {
        let mut recipe = shapeless_recipe(3);
        recipe.width = Some(1);
        recipe.height = Some(3);
        let grid = normalize_grid(&recipe);
        assert_eq!(grid[0][0].item, "minecraft:input_0");
        assert!(grid[1][0].is_air());
        assert_eq!(grid[3][0].item, "minecraft:input_1");
        assert_eq!(grid[6][0].item, "minecraft:input_2");
    }

    #[test]
    fn test_empty_declared_slot_becomes_air() {
        let mut recipe = shapeless_recipe(0);
        recipe.width = Some(2);
        recipe.height = Some(2);
        let grid = normalize_grid(&recipe);
        assert!(grid.iter().all(|cell| cell.len() == 1 && cell[0].is_air()));
    }

    #[test]
    fn test_alternatives_preserved_in_cell() {
        let mut recipe = shapeless_recipe(1);
        recipe.input[0].push(Item::of("minecraft:alternative"));
        let grid = normalize_grid(&recipe);
        assert_eq!(grid[0].len(), 2);
    }
}
