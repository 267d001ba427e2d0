//! Infobook document model.
//!
//! An infobook is a tree of [`Section`]s plus a flat index of every
//! section keyed by its translation key. Sections are created once by the
//! parser and only mutated during book injection; serialization never
//! mutates them.

pub mod appendix;
mod initializer;
mod item;
mod plugin;

pub use initializer::InfoBookInitializer;
pub use item::{Fluid, Item};
pub use plugin::InfobookPlugin;

use crate::log;
use anyhow::{Result, anyhow};
use appendix::Appendix;
use std::collections::HashMap;
use std::fmt;

/// A node in the infobook document tree.
///
/// A section is a *leaf* iff it has no subsections. Leaves become content
/// pages; non-leaves become navigation index pages and their own
/// paragraphs and appendices are never rendered.
pub struct Section {
    /// Translation key acting as the section's stable identity
    pub name_translation_key: String,
    /// Identifier of the mod owning this section
    pub mod_id: String,
    /// Ordered child sections, exclusively owned by this section
    pub sub_sections: Vec<Section>,
    /// Ordered paragraph translation keys, kept untranslated until render
    pub paragraph_translation_keys: Vec<String>,
    /// Ordered appendices; `None` marks a content gap left by an
    /// unregistered appendix type
    pub appendices: Vec<Option<Box<dyn Appendix>>>,
    /// Free-form tag strings used for the global cross-reference index
    pub tags: Vec<String>,
}

impl Section {
    /// Create an empty section with the given identity.
    pub fn new(name_translation_key: impl Into<String>, mod_id: impl Into<String>) -> Self {
        Self {
            name_translation_key: name_translation_key.into(),
            mod_id: mod_id.into(),
            sub_sections: Vec::new(),
            paragraph_translation_keys: Vec::new(),
            appendices: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// A section is a leaf iff it has zero subsections.
    pub fn is_leaf(&self) -> bool {
        self.sub_sections.is_empty()
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name_translation_key", &self.name_translation_key)
            .field("mod_id", &self.mod_id)
            .field("sub_sections", &self.sub_sections)
            .field(
                "paragraph_translation_keys",
                &self.paragraph_translation_keys,
            )
            .field("appendices", &self.appendices.len())
            .field("tags", &self.tags)
            .finish()
    }
}

/// Tree position of a section: child indices from the root.
pub type SectionPath = Vec<usize>;

/// A root section plus a flat index of every reachable section.
///
/// Index keys are translation keys; they must be unique across the whole
/// tree. Merging injected sub-books overwrites on collision (with a
/// logged warning).
#[derive(Debug)]
pub struct InfoBook {
    /// The root of the section tree
    pub root_section: Section,
    sections: HashMap<String, SectionPath>,
}

impl InfoBook {
    /// Construct a book from a root section and its flat index.
    pub fn new(root_section: Section, sections: HashMap<String, SectionPath>) -> Self {
        Self {
            root_section,
            sections,
        }
    }

    /// Number of indexed sections, including the root.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Whether the flat index knows the given translation key.
    pub fn contains_section(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Look up a section by translation key.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.get(key).map(|path| resolve(&self.root_section, path))
    }

    /// Append an externally-parsed book as a new subsection of the
    /// section identified by `target_key`, merging its flat index.
    ///
    /// Fails if the target key is unknown. Index collisions overwrite the
    /// earlier entry and log a warning.
    pub fn inject(&mut self, target_key: &str, sub_book: InfoBook) -> Result<()> {
        let target_path = self
            .sections
            .get(target_key)
            .cloned()
            .ok_or_else(|| anyhow!("Could not find section '{target_key}' to inject into"))?;

        let target = resolve_mut(&mut self.root_section, &target_path);
        let child_index = target.sub_sections.len();
        target.sub_sections.push(sub_book.root_section);

        for (key, sub_path) in sub_book.sections {
            let mut path = target_path.clone();
            path.push(child_index);
            path.extend(sub_path);
            if self.sections.insert(key.clone(), path).is_some() {
                log!("warn"; "overwriting duplicate section key '{key}' during injection");
            }
        }
        Ok(())
    }

    /// Append a synthesized top-level subsection and index it.
    pub fn push_root_subsection(&mut self, section: Section) {
        let key = section.name_translation_key.clone();
        let index = self.root_section.sub_sections.len();
        self.root_section.sub_sections.push(section);
        if self.sections.insert(key.clone(), vec![index]).is_some() {
            log!("warn"; "overwriting duplicate section key '{key}'");
        }
    }
}

fn resolve<'a>(mut section: &'a Section, path: &[usize]) -> &'a Section {
    for &index in path {
        section = &section.sub_sections[index];
    }
    section
}

fn resolve_mut<'a>(mut section: &'a mut Section, path: &[usize]) -> &'a mut Section {
    for &index in path {
        section = &mut section.sub_sections[index];
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_child() -> InfoBook {
        let mut root = Section::new("root", "examplemod");
        root.sub_sections.push(Section::new("child", "examplemod"));
        let mut sections = HashMap::new();
        sections.insert("root".to_owned(), vec![]);
        sections.insert("child".to_owned(), vec![0]);
        InfoBook::new(root, sections)
    }

    fn single_section_book(key: &str, mod_id: &str) -> InfoBook {
        let mut sections = HashMap::new();
        sections.insert(key.to_owned(), vec![]);
        InfoBook::new(Section::new(key, mod_id), sections)
    }

    #[test]
    fn test_section_lookup() {
        let book = book_with_child();
        assert_eq!(book.section("child").unwrap().name_translation_key, "child");
        assert!(book.section("missing").is_none());
    }

    #[test]
    fn test_inject_into_missing_target_fails() {
        let mut book = book_with_child();
        let err = book
            .inject("nope", single_section_book("other", "othermod"))
            .unwrap_err();
        assert!(err.to_string().contains("'nope'"));
    }

    #[test]
    fn test_inject_appends_and_merges_index() {
        let mut book = book_with_child();
        book.inject("child", single_section_book("other", "othermod"))
            .unwrap();
        let child = book.section("child").unwrap();
        assert_eq!(child.sub_sections.len(), 1);
        assert_eq!(child.sub_sections[0].mod_id, "othermod");
        assert_eq!(book.section("other").unwrap().mod_id, "othermod");
        assert_eq!(book.section_count(), 3);
    }

    #[test]
    fn test_inject_collision_overwrites() {
        let mut book = book_with_child();
        book.inject("child", single_section_book("child", "othermod"))
            .unwrap();
        // later entry wins
        assert_eq!(book.section("child").unwrap().mod_id, "othermod");
    }

    #[test]
    fn test_push_root_subsection() {
        let mut book = book_with_child();
        book.push_root_subsection(Section::new("extra", "examplemod"));
        assert_eq!(book.root_section.sub_sections.len(), 2);
        assert!(book.contains_section("extra"));
    }
}
