//! Generates static multi-language HTML documentation sites from XML
//! infobooks.

mod cli;
mod config;
mod infobook;
mod logger;
mod parse;
mod resource;
mod serialize;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use config::BookConfig;
use infobook::appendix::{
    AppendixHandlerAdvancementRewards, AppendixHandlerCraftingRecipe, AppendixHandlerImage,
    AppendixHandlerKeybinding, AppendixHandlerSmeltingRecipe, AppendixHandlerTextfield,
    CRAFTING_REGISTRY_ID, SMELTING_REGISTRY_ID,
};
use infobook::{InfoBookInitializer, InfobookPlugin};
use resource::ResourceLoader;
use serialize::{HtmlInfoBookSerializer, SerializeOptions};
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build {
            output,
            registries,
            icons,
            assets,
            base_url,
        } => {
            let mut config = BookConfig::from_path(&cli.config)?;
            if let Some(base_url) = base_url {
                config.base_url = base_url.clone();
            }
            build(&config, output, registries, icons, assets)
        }
    }
}

fn build(
    config: &BookConfig,
    output: &Path,
    registries: &Path,
    icons: &Path,
    assets: &[PathBuf],
) -> Result<()> {
    if !registries.is_dir() {
        bail!(
            "Could not find the registries directory '{}', generate it from the mod metadata first",
            registries.display()
        );
    }
    if !icons.is_dir() {
        bail!(
            "Could not find the icons directory '{}', export the item icons first",
            icons.display()
        );
    }

    // Statically linked plugins would be pushed here.
    let plugins: Vec<Box<dyn InfobookPlugin>> = Vec::new();

    crate::log!("build"; "Loading resources");
    let mut loader = ResourceLoader::new();
    loader.load_icons(icons)?;
    loader.load_item_translation_keys(registries)?;
    loader.load_fluid_translation_keys(registries)?;
    loader.load_keybindings(&config.keybindings)?;
    loader.load_all(&config.base_dir, &config.resources)?;

    crate::log!("build"; "Initializing infobook");
    let mut initializer = InfoBookInitializer::new(config)?;
    for plugin in &plugins {
        plugin.load(&mut initializer, &mut loader, config)?;
    }
    let resources = Rc::new(loader.into_handler());
    initializer.register_appendix_handler(
        "advancement_rewards",
        Box::new(AppendixHandlerAdvancementRewards::new(Rc::clone(&resources))),
    )?;
    initializer.register_appendix_handler(
        "crafting_recipe",
        Box::new(AppendixHandlerCraftingRecipe::new(
            registries,
            config.recipe_overrides.get(CRAFTING_REGISTRY_ID),
        )?),
    )?;
    initializer.register_appendix_handler(
        "smelting_recipe",
        Box::new(AppendixHandlerSmeltingRecipe::new(
            registries,
            config.recipe_overrides.get(SMELTING_REGISTRY_ID),
        )?),
    )?;
    initializer.register_appendix_handler(
        "image",
        Box::new(AppendixHandlerImage::new(Rc::clone(&resources))),
    )?;
    initializer.register_appendix_handler(
        "keybinding",
        Box::new(AppendixHandlerKeybinding::new(Rc::clone(&resources))),
    )?;
    initializer
        .register_appendix_handler("textfield", Box::new(AppendixHandlerTextfield))?;

    let book = initializer.initialize()?;
    crate::log!("build"; "Parsed {} sections", book.section_count());

    let serializer = HtmlInfoBookSerializer::new();
    serializer.serialize(
        &book,
        &SerializeOptions {
            output_path: output,
            config,
            resources: &resources,
            assets_paths: assets.to_vec(),
            plugins: &plugins,
        },
    )?;
    crate::log!("build"; "Wrote site to {}", output.display());
    Ok(())
}
