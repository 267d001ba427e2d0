//! Pluggable appendix types for leaf sections.
//!
//! An appendix is a typed rich-content block (recipe display, image,
//! keybinding, ...) attached to a section. Appendix types are dispatched
//! through a string-keyed registry on the parser: each type maps to an
//! [`AppendixHandler`] that turns raw parsed XML into a renderable
//! [`Appendix`] trait object.

mod ad;
mod advancement;
mod crafting;
mod image;
mod keybinding;
pub mod recipe;
mod smelting;
mod tag_index;
mod textfield;

pub use ad::AppendixAd;
pub use advancement::AppendixHandlerAdvancementRewards;
pub use crafting::AppendixHandlerCraftingRecipe;
pub use crafting::REGISTRY_ID as CRAFTING_REGISTRY_ID;
pub use smelting::REGISTRY_ID as SMELTING_REGISTRY_ID;
pub use image::AppendixHandlerImage;
pub use keybinding::AppendixHandlerKeybinding;
pub use smelting::AppendixHandlerSmeltingRecipe;
pub use tag_index::AppendixTagIndex;
pub use textfield::AppendixHandlerTextfield;

use crate::parse::XmlNode;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext};
use anyhow::Result;

/// A renderable rich-content block owned by a section.
pub trait Appendix {
    /// Optional localized display name shown above the appendix box.
    fn name(&self, _ctx: &SerializeContext<'_>) -> Result<Option<String>> {
        Ok(None)
    }

    /// Whether to skip the standard appendix box around this appendix.
    fn skip_wrapper(&self) -> bool {
        false
    }

    /// Produce the HTML fragment for this appendix.
    ///
    /// The serializer is passed back in so appendices can call its
    /// item/fluid display helpers; the file writer emits auxiliary
    /// assets (icons, images) into the output.
    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        serializer: &HtmlInfoBookSerializer,
    ) -> Result<String>;
}

/// Creates appendices of a specific type from raw parsed XML.
///
/// Handlers are constructed once with whatever external registries they
/// need and are stateless per call.
pub trait AppendixHandler {
    fn create_appendix(&self, data: &XmlNode, mod_id: &str) -> Result<Box<dyn Appendix>>;
}
