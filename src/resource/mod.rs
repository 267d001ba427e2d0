//! Game resource stores and loading.
//!
//! The [`ResourceHandler`] is an in-memory lookup store for translations,
//! item/fluid icons and translation keys, advancements and keybindings;
//! the [`ResourceLoader`] populates it from the directories produced by
//! the external metadata-harvesting step.

mod handler;
mod loader;

pub use handler::{Advancement, DEFAULT_LANGUAGE, ResourceHandler};
pub use loader::ResourceLoader;
