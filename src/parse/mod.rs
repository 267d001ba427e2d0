//! XML infobook parsing.
//!
//! Reads an XML document into a generic [`XmlNode`] tree with quick-xml,
//! then converts it recursively into a [`Section`] tree plus a flat index
//! of sections keyed by translation key. Appendix elements are dispatched
//! through a string-keyed handler registry so plugins can contribute new
//! appendix types.

mod node;

pub use node::XmlNode;

use crate::infobook::appendix::AppendixHandler;
use crate::infobook::{InfoBook, Section, SectionPath};
use crate::log;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Structural parsing errors.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No valid root section was found.")]
    NoRootSection,

    #[error("Section element is missing a name attribute in: {0}")]
    MissingSectionName(String),

    #[error("Appendix element is missing a type or factory attribute in: {0}")]
    MissingAppendixType(String),

    #[error("An appendix handler for type '{0}' is already registered")]
    DuplicateHandler(String),
}

/// Parses an XML file into an [`InfoBook`].
#[derive(Default)]
pub struct XmlInfoBookParser {
    handlers: HashMap<String, Box<dyn AppendixHandler>>,
}

impl XmlInfoBookParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an appendix handler for the given type.
    ///
    /// Type names are a flat namespace per parser instance; registering a
    /// second handler under the same type is a setup error.
    pub fn register_appendix_handler(
        &mut self,
        appendix_type: impl Into<String>,
        handler: Box<dyn AppendixHandler>,
    ) -> Result<()> {
        let appendix_type = appendix_type.into();
        if self.handlers.contains_key(&appendix_type) {
            return Err(ParseError::DuplicateHandler(appendix_type).into());
        }
        self.handlers.insert(appendix_type, handler);
        Ok(())
    }

    /// Parse the infobook at the given path, owned by `mod_id`.
    pub fn parse(&self, path: &Path, mod_id: &str) -> Result<InfoBook> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read infobook file: {}", path.display()))?;
        self.parse_str(&content, mod_id)
            .with_context(|| format!("Failed to parse infobook file: {}", path.display()))
    }

    /// Parse an infobook from an XML string, owned by `mod_id`.
    pub fn parse_str(&self, xml: &str, mod_id: &str) -> Result<InfoBook> {
        let document = node::parse_document(xml)?;
        let root = document
            .children_named("section")
            .next()
            .ok_or(ParseError::NoRootSection)?;

        let mut sections = HashMap::new();
        let root_section = self.node_to_section(root, mod_id, &[], &mut sections)?;
        Ok(InfoBook::new(root_section, sections))
    }

    /// Convert a `section` element into a [`Section`], inserting it and
    /// all of its descendants into the flat index.
    fn node_to_section(
        &self,
        node: &XmlNode,
        mod_id: &str,
        path: &[usize],
        index: &mut HashMap<String, SectionPath>,
    ) -> Result<Section> {
        let name = node
            .attribute("name")
            .ok_or_else(|| ParseError::MissingSectionName(node.to_xml_string()))?
            .to_owned();

        let mut section = Section::new(name.clone(), mod_id);
        for child in &node.children {
            match child.name.as_str() {
                "section" => {
                    let mut child_path = path.to_vec();
                    child_path.push(section.sub_sections.len());
                    let sub = self.node_to_section(child, mod_id, &child_path, index)?;
                    section.sub_sections.push(sub);
                }
                "paragraph" => {
                    section
                        .paragraph_translation_keys
                        .push(child.text.trim().to_owned());
                }
                "appendix" | "appendix_list" => {
                    section.appendices.push(self.node_to_appendix(child, mod_id)?);
                }
                "tag" => {
                    section.tags.push(child.text.trim().to_owned());
                }
                _ => {}
            }
        }

        // Keys are expected to be unique; later insertions win on collision.
        index.insert(name, path.to_vec());
        Ok(section)
    }

    /// Convert an `appendix` element through the handler registry.
    ///
    /// A missing `type`/`factory` attribute is a hard failure; an
    /// unregistered type is a recoverable content gap rendered as an
    /// absent appendix.
    fn node_to_appendix(
        &self,
        node: &XmlNode,
        mod_id: &str,
    ) -> Result<Option<Box<dyn crate::infobook::appendix::Appendix>>> {
        let appendix_type = node
            .attribute("type")
            .or_else(|| node.attribute("factory"))
            .ok_or_else(|| ParseError::MissingAppendixType(node.to_xml_string()))?;

        match self.handlers.get(appendix_type) {
            Some(handler) => {
                let appendix = handler.create_appendix(node, mod_id).with_context(|| {
                    format!("Failed to create appendix of type '{appendix_type}'")
                })?;
                Ok(Some(appendix))
            }
            None => {
                log!("parse"; "no appendix handler registered for type '{appendix_type}', skipping");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infobook::appendix::Appendix;
    use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext};
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct DummyAppendix;

    impl Appendix for DummyAppendix {
        fn to_html(
            &self,
            _ctx: &SerializeContext<'_>,
            _files: &mut FileWriter,
            _serializer: &HtmlInfoBookSerializer,
        ) -> Result<String> {
            Ok("<div>dummy</div>".to_owned())
        }
    }

    struct DummyHandler;

    impl AppendixHandler for DummyHandler {
        fn create_appendix(&self, _data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
            Ok(Box::new(DummyAppendix))
        }
    }

    #[test]
    fn test_parse_missing_file_fails() {
        let parser = XmlInfoBookParser::new();
        let err = parser
            .parse(Path::new("/nonexistent/infobook.xml"), "examplemod")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read infobook file"));
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<section name="abc"><paragraph>abc.p1</paragraph></section>"#
        )
        .unwrap();

        let parser = XmlInfoBookParser::new();
        let book = parser.parse(file.path(), "examplemod").unwrap();
        assert_eq!(book.root_section.name_translation_key, "abc");
        assert_eq!(book.root_section.paragraph_translation_keys, vec!["abc.p1"]);
    }

    #[test]
    fn test_missing_root_section_fails() {
        let parser = XmlInfoBookParser::new();
        let err = parser
            .parse_str("<blabla name=\"abc\" />", "examplemod")
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid root section was found.");
    }

    #[test]
    fn test_parse_empty_section() {
        let parser = XmlInfoBookParser::new();
        let book = parser.parse_str(r#"<section name="abc" />"#, "examplemod").unwrap();
        let root = &book.root_section;
        assert_eq!(root.name_translation_key, "abc");
        assert!(root.sub_sections.is_empty());
        assert!(root.paragraph_translation_keys.is_empty());
        assert!(root.appendices.is_empty());
        assert!(root.tags.is_empty());
        assert_eq!(book.section_count(), 1);
        assert!(book.contains_section("abc"));
    }

    #[test]
    fn test_parse_nested_sections_indexes_all() {
        let parser = XmlInfoBookParser::new();
        let xml = r#"
            <section name="abc">
                <section name="a_1">
                    <paragraph>a_1.text1</paragraph>
                    <tag>examplemod:example_block</tag>
                </section>
                <section name="a_2" />
            </section>"#;
        let book = parser.parse_str(xml, "examplemod").unwrap();

        assert_eq!(book.section_count(), 3);
        assert_eq!(book.root_section.sub_sections.len(), 2);
        let a_1 = book.section("a_1").unwrap();
        assert_eq!(a_1.paragraph_translation_keys, vec!["a_1.text1"]);
        assert_eq!(a_1.tags, vec!["examplemod:example_block"]);
        assert!(book.section("a_2").unwrap().is_leaf());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = XmlInfoBookParser::new();
        let xml = r#"
            <section name="abc">
                <section name="a_1"><paragraph>p</paragraph></section>
                <section name="a_2" />
            </section>"#;
        let first = parser.parse_str(xml, "examplemod").unwrap();
        let second = parser.parse_str(xml, "examplemod").unwrap();

        assert_eq!(first.section_count(), second.section_count());
        for key in ["abc", "a_1", "a_2"] {
            let a = first.section(key).unwrap();
            let b = second.section(key).unwrap();
            assert_eq!(a.name_translation_key, b.name_translation_key);
            assert_eq!(a.sub_sections.len(), b.sub_sections.len());
            assert_eq!(a.paragraph_translation_keys, b.paragraph_translation_keys);
        }
    }

    #[test]
    fn test_appendix_without_type_fails() {
        let parser = XmlInfoBookParser::new();
        let xml = r#"<section name="abc"><appendix>examplemod:thing</appendix></section>"#;
        let err = parser.parse_str(xml, "examplemod").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("missing a type or factory attribute"));
        assert!(message.contains("examplemod:thing"));
    }

    #[test]
    fn test_unregistered_appendix_type_yields_gap() {
        let parser = XmlInfoBookParser::new();
        let xml = r#"
            <section name="abc">
                <section name="a_1">
                    <appendix type="unknown">x</appendix>
                    <paragraph>still.parsed</paragraph>
                </section>
            </section>"#;
        let book = parser.parse_str(xml, "examplemod").unwrap();
        let a_1 = book.section("a_1").unwrap();
        assert_eq!(a_1.appendices.len(), 1);
        assert!(a_1.appendices[0].is_none());
        assert_eq!(a_1.paragraph_translation_keys, vec!["still.parsed"]);
    }

    #[test]
    fn test_registered_appendix_type_is_created() {
        let mut parser = XmlInfoBookParser::new();
        parser
            .register_appendix_handler("dummy", Box::new(DummyHandler))
            .unwrap();
        let xml = r#"<section name="abc"><appendix type="dummy">x</appendix></section>"#;
        let book = parser.parse_str(xml, "examplemod").unwrap();
        assert!(book.root_section.appendices[0].is_some());
    }

    #[test]
    fn test_factory_attribute_is_accepted() {
        let mut parser = XmlInfoBookParser::new();
        parser
            .register_appendix_handler("dummy", Box::new(DummyHandler))
            .unwrap();
        let xml = r#"<section name="abc"><appendix factory="dummy">x</appendix></section>"#;
        let book = parser.parse_str(xml, "examplemod").unwrap();
        assert!(book.root_section.appendices[0].is_some());
    }

    #[test]
    fn test_duplicate_handler_registration_fails() {
        let mut parser = XmlInfoBookParser::new();
        parser
            .register_appendix_handler("dummy", Box::new(DummyHandler))
            .unwrap();
        let err = parser
            .register_appendix_handler("dummy", Box::new(DummyHandler))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "An appendix handler for type 'dummy' is already registered"
        );
    }
}
