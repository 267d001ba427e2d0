//! Two-pass HTML serialization: an index pass collecting page order and
//! tag targets per language, then a render pass emitting the pages.

pub mod file_writer;
pub mod format;
pub mod templates;

pub use file_writer::FileWriter;

use crate::config::BookConfig;
use crate::infobook::appendix::{Appendix, AppendixAd};
use crate::infobook::{Fluid, InfoBook, InfobookPlugin, Item, Section};
use crate::log;
use crate::resource::{DEFAULT_LANGUAGE, ResourceHandler};
use anyhow::{Result, anyhow, bail};
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use templates::{Breadcrumb, PageShell, SectionLink};
use walkdir::WalkDir;

/// Default stylesheet shipped with every generated site.
/// Loaded from `src/embed/styles.css` at compile time.
const DEFAULT_STYLESHEET: &str = include_str!("../embed/styles.css");

/// One leaf page in canonical reading order.
#[derive(Debug)]
pub struct PageEntry {
    pub url: String,
    pub name_translation_key: String,
}

/// Per-language page inventory built during the index pass.
///
/// Holds every leaf page in document order (for prev/next navigation)
/// and a map from declared tag to the URL of the page declaring it.
#[derive(Debug, Default)]
pub struct SectionIndex {
    pages: Vec<PageEntry>,
    positions: HashMap<String, usize>,
    tags: BTreeMap<String, String>,
}

impl SectionIndex {
    fn register_page(&mut self, url: String, name_translation_key: String) {
        self.positions.insert(url.clone(), self.pages.len());
        self.pages.push(PageEntry {
            url,
            name_translation_key,
        });
    }

    fn register_tag(&mut self, tag: &str, url: &str) {
        self.tags.insert(tag.to_owned(), url.to_owned());
    }

    pub fn previous_page(&self, url: &str) -> Option<&PageEntry> {
        let position = *self.positions.get(url)?;
        position.checked_sub(1).and_then(|p| self.pages.get(p))
    }

    pub fn next_page(&self, url: &str) -> Option<&PageEntry> {
        let position = *self.positions.get(url)?;
        self.pages.get(position + 1)
    }

    /// URL of the page that declared the given tag, if any.
    pub fn tag_url(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    /// All declared tags with their page URLs, in tag order.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .map(|(tag, url)| (tag.as_str(), url.as_str()))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Per-language render state handed to every appendix.
pub struct SerializeContext<'a> {
    pub config: &'a BookConfig,
    pub resources: &'a ResourceHandler,
    pub index: &'a SectionIndex,
    pub language: &'a str,
    pub head_suffix: &'a str,
}

impl SerializeContext<'_> {
    /// Raw translation lookup with default-language fallback.
    pub fn translate(&self, translation_key: &str) -> Result<&str> {
        self.resources.get_translation(translation_key, self.language)
    }

    /// Translation lookup with formatting codes rewritten to HTML.
    pub fn translate_formatted(&self, translation_key: &str) -> Result<String> {
        Ok(format::format_string(self.translate(translation_key)?))
    }
}

/// Everything `serialize` needs besides the book itself.
pub struct SerializeOptions<'a> {
    pub output_path: &'a Path,
    pub config: &'a BookConfig,
    pub resources: &'a ResourceHandler,
    /// Additional asset directories copied into the output's `assets/`
    pub assets_paths: Vec<PathBuf>,
    pub plugins: &'a [Box<dyn InfobookPlugin>],
}

/// Serializes an infobook to a tree of static HTML files.
#[derive(Debug, Default)]
pub struct HtmlInfoBookSerializer;

impl HtmlInfoBookSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Write the full output tree: one subtree per language (default
    /// language at the root), a shared `assets/` directory, and all
    /// plugin-contributed assets.
    pub fn serialize(&self, book: &InfoBook, opts: &SerializeOptions<'_>) -> Result<()> {
        if opts.output_path.is_file() {
            bail!("Could not serialize to a file, must be a directory.");
        }
        fs::create_dir_all(opts.output_path.join("assets").join("icons"))?;
        // Written before the extra asset directories so a user-supplied
        // stylesheet can overwrite it.
        fs::write(
            opts.output_path.join("assets").join("styles.css"),
            DEFAULT_STYLESHEET,
        )?;

        let base_url = opts.config.base_url.as_str();
        let mut files = FileWriter::new(
            opts.output_path.join("assets"),
            format!("{base_url}assets/"),
        );

        for language in opts.resources.get_languages() {
            log!("serialize"; "Serializing language {language}");
            let (language_path, language_url) = if language == DEFAULT_LANGUAGE {
                (
                    opts.output_path.to_path_buf(),
                    base_url.trim_end_matches('/').to_owned(),
                )
            } else {
                (
                    opts.output_path.join(language),
                    format!("{base_url}{language}"),
                )
            };

            // Index pass: collect page order and tag targets.
            let mut index = SectionIndex::default();
            Self::index_section(&book.root_section, &language_url, &mut index);

            let head_suffix: String = opts
                .plugins
                .iter()
                .map(|plugin| plugin.head_suffix(opts.config, language))
                .collect();
            let ctx = SerializeContext {
                config: opts.config,
                resources: opts.resources,
                index: &index,
                language,
                head_suffix: &head_suffix,
            };

            // Render pass.
            self.serialize_section(
                &book.root_section,
                &language_path,
                &language_url,
                &[],
                &ctx,
                &mut files,
            )?;
        }

        for assets_path in opts
            .assets_paths
            .iter()
            .cloned()
            .chain(opts.plugins.iter().filter_map(|plugin| plugin.assets_path()))
        {
            log!("serialize"; "Copying assets from {}", assets_path.display());
            copy_directory(&assets_path, &opts.output_path.join("assets"))?;
        }

        Ok(())
    }

    /// Depth-first leaf registration in document order.
    fn index_section(section: &Section, location: &str, index: &mut SectionIndex) {
        if section.is_leaf() {
            let url = format!("{location}.html");
            for tag in &section.tags {
                index.register_tag(tag, &url);
            }
            index.register_page(url, section.name_translation_key.clone());
        } else {
            for sub_section in &section.sub_sections {
                let sub_location =
                    format!("{location}/{}", child_location(section, sub_section));
                Self::index_section(sub_section, &sub_location, index);
            }
        }
    }

    fn serialize_section(
        &self,
        section: &Section,
        fs_location: &Path,
        url_location: &str,
        breadcrumbs: &[Breadcrumb],
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
    ) -> Result<SectionLink> {
        let title = ctx.translate_formatted(&section.name_translation_key)?;

        if section.is_leaf() {
            self.serialize_leaf(section, fs_location, url_location, breadcrumbs, ctx, files, title)
        } else {
            fs::create_dir_all(fs_location)?;

            let mut sub_breadcrumbs = breadcrumbs.to_vec();
            sub_breadcrumbs.push(Breadcrumb {
                name: title.clone(),
                url: Some(format!("{url_location}/")),
            });
            let mut children = Vec::with_capacity(section.sub_sections.len());
            for sub_section in &section.sub_sections {
                let relative = child_location(section, sub_section);
                children.push(self.serialize_section(
                    sub_section,
                    &fs_location.join(&relative),
                    &format!("{url_location}/{relative}"),
                    &sub_breadcrumbs,
                    ctx,
                    files,
                )?);
            }

            let mut page_breadcrumbs = breadcrumbs.to_vec();
            page_breadcrumbs.push(Breadcrumb {
                name: title.clone(),
                url: None,
            });
            let contents =
                templates::index_page(&self.shell(ctx, &title), &page_breadcrumbs, &children);
            fs::write(fs_location.join("index.html"), contents)?;

            Ok(SectionLink {
                url: format!("{url_location}/"),
                title,
            })
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn serialize_leaf(
        &self,
        section: &Section,
        fs_location: &Path,
        url_location: &str,
        breadcrumbs: &[Breadcrumb],
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        title: String,
    ) -> Result<SectionLink> {
        if let Some(parent) = fs_location.parent() {
            fs::create_dir_all(parent)?;
        }
        let url = format!("{url_location}.html");

        let paragraphs: Vec<String> = section
            .paragraph_translation_keys
            .iter()
            .map(|key| ctx.translate_formatted(key))
            .collect::<Result<_>>()?;

        let mut appendices = Vec::new();
        for appendix in section.appendices.iter().flatten() {
            let contents = appendix.to_html(ctx, files, self)?;
            appendices.push(if appendix.skip_wrapper() {
                contents
            } else {
                templates::appendix_wrapper(appendix.name(ctx)?.as_deref(), &contents)
            });
        }
        if ctx.config.google_adsense.is_some() {
            appendices.push(AppendixAd.to_html(ctx, files, self)?);
        }

        let previous = self.navigation_link(ctx, ctx.index.previous_page(&url))?;
        let next = self.navigation_link(ctx, ctx.index.next_page(&url))?;

        let mut page_breadcrumbs = breadcrumbs.to_vec();
        page_breadcrumbs.push(Breadcrumb {
            name: title.clone(),
            url: None,
        });
        let contents = templates::section_page(
            &self.shell(ctx, &title),
            &page_breadcrumbs,
            &paragraphs,
            &appendices,
            previous.as_ref(),
            next.as_ref(),
        );
        fs::write(fs_location.with_extension("html"), contents)?;

        Ok(SectionLink { url, title })
    }

    fn navigation_link(
        &self,
        ctx: &SerializeContext<'_>,
        entry: Option<&PageEntry>,
    ) -> Result<Option<SectionLink>> {
        match entry {
            Some(entry) => Ok(Some(SectionLink {
                url: entry.url.clone(),
                title: ctx.translate_formatted(&entry.name_translation_key)?,
            })),
            None => Ok(None),
        }
    }

    fn shell<'a>(&self, ctx: &'a SerializeContext<'_>, title: &'a str) -> PageShell<'a> {
        PageShell {
            main_title: &ctx.config.title,
            section_title: title,
            language: ctx.language,
            base_url: &ctx.config.base_url,
            head_suffix: ctx.head_suffix,
            colors: &ctx.config.colors,
        }
    }

    /// Render an item as an icon with name, count and optional link.
    ///
    /// Links prefer the in-book page that declared the item as a tag;
    /// built-in game content falls back to the external wiki.
    pub fn create_item_display(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        item: &Item,
        slot: bool,
        annotation: &str,
    ) -> Result<String> {
        if item.is_air() {
            return Ok(templates::empty_item(slot));
        }

        let icon = match ctx.resources.get_item_icon_file(item) {
            Some(icon) => icon,
            None => bail!(
                "Could not find an icon for item {}",
                serde_json::to_string(item)?
            ),
        };
        let icon_url = files.write(&icon_asset_name(icon)?, icon)?;

        let translation_key = match ctx.resources.get_item_translation_key(item) {
            Some(translation_key) => translation_key,
            None => bail!(
                "Could not find a translation key for item {}",
                serde_json::to_string(item)?
            ),
        };
        let name = ctx.translate_formatted(translation_key)?;

        let link = match ctx.index.tag_url(&item.item) {
            Some(url) => Some(url.to_owned()),
            None if item.namespace() == "minecraft" => Some(format!(
                "{}{}",
                ctx.config.wiki_base_url(),
                name.replace(' ', "_")
            )),
            None => None,
        };

        Ok(templates::item_display(
            slot,
            &icon_url,
            &name,
            item.count,
            annotation,
            link.as_deref(),
        ))
    }

    /// Render a fluid as an icon with name and amount.
    pub fn create_fluid_display(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        fluid: &Fluid,
        slot: bool,
    ) -> Result<String> {
        let icon = match ctx.resources.get_fluid_icon_file(&fluid.fluid) {
            Some(icon) => icon,
            None => bail!(
                "Could not find an icon for fluid {}",
                serde_json::to_string(fluid)?
            ),
        };
        let icon_url = files.write(&icon_asset_name(icon)?, icon)?;

        let translation_key = ctx
            .resources
            .get_fluid_translation_key(&fluid.fluid)
            .ok_or_else(|| {
                anyhow!("Could not find a translation key for fluid '{}'", fluid.fluid)
            })?;
        let name = ctx.translate_formatted(translation_key)?;

        let link = ctx
            .index
            .tags()
            .find(|(tag, _)| tag.split_once(':').map_or(*tag, |(_, path)| path) == fluid.fluid)
            .map(|(_, url)| url.to_owned());

        Ok(templates::item_display(
            slot,
            &icon_url,
            &name,
            fluid.amount,
            "",
            link.as_deref(),
        ))
    }
}

/// Relative output location of a child under its parent. Children owned
/// by a different mod are nested one directory deeper, named by that
/// mod's id, so key namespaces of different mods cannot collide.
fn child_location(parent: &Section, child: &Section) -> String {
    let key = child.name_translation_key.as_str();
    let slug = match key.rfind('.') {
        Some(position) => &key[position + 1..],
        None => key,
    };
    if child.mod_id != parent.mod_id {
        format!("{}/{slug}", child.mod_id)
    } else {
        slug.to_owned()
    }
}

fn icon_asset_name(icon: &Path) -> Result<String> {
    let file_name = icon
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| anyhow!("Invalid icon file name: {}", icon.display()))?;
    Ok(format!("icons/{file_name}"))
}

/// Recursively copy all files under `source` into `destination`.
fn copy_directory(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let target = destination.join(entry.path().strip_prefix(source)?);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
