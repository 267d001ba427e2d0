//! The generated tag index appendix: a cross-reference from every tag
//! collected during the index pass to the page that declared it.

use super::Appendix;
use crate::infobook::{Fluid, Item};
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Result, anyhow};

/// An appendix that lists all tags with links to them.
///
/// Synthesized by the book initializer, never user-authored.
#[derive(Default)]
pub struct AppendixTagIndex;

impl Appendix for AppendixTagIndex {
    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        let mut links = Vec::new();
        for (tag, url) in ctx.index.tags() {
            // Resolve the tag as an item first, falling back to a fluid.
            let item = Item::of(tag);
            let (icon, name) = match ctx.resources.get_item_translation_key(&item) {
                Some(translation_key) => {
                    let name = ctx.translate_formatted(translation_key)?;
                    let icon = serializer.create_item_display(ctx, files, &item, false, "")?;
                    (icon, name)
                }
                None => {
                    let fluid = Fluid::of(tag.split_once(':').map_or(tag, |(_, name)| name));
                    let translation_key = ctx
                        .resources
                        .get_fluid_translation_key(&fluid.fluid)
                        .ok_or_else(|| {
                            anyhow!("Could not resolve tag '{tag}' as an item or fluid")
                        })?;
                    let name = ctx.translate_formatted(translation_key)?;
                    let icon = serializer.create_fluid_display(ctx, files, &fluid, false)?;
                    (icon, name)
                }
            };
            links.push(templates::TagLink {
                url: url.to_owned(),
                name,
                icon,
            });
        }
        links.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates::tag_index(&links))
    }
}
