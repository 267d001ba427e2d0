//! Generic XML node tree built from quick-xml events.

use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fmt::Write as _;

/// A parsed XML element: name, attributes, child elements and text
/// content (all text fragments concatenated, CDATA included).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterate over child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Serialize this element back to a compact XML string, used in
    /// error messages to identify the offending element.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        write!(out, "<{}", self.name).ok();
        let mut attributes: Vec<_> = self.attributes.iter().collect();
        attributes.sort();
        for (key, value) in attributes {
            write!(out, " {key}=\"{value}\"").ok();
        }
        if self.children.is_empty() && self.text.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        out.push_str(self.text.trim());
        for child in &self.children {
            child.write_xml(out);
        }
        write!(out, "</{}>", self.name).ok();
    }
}

fn node_from_start(start: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..XmlNode::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

/// Parse an XML document into a synthetic root node whose children are
/// the document's top-level elements.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut document = XmlNode {
        name: "#document".to_owned(),
        ..XmlNode::default()
    };
    let mut stack: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(node_from_start(&start)?);
            }
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => document.children.push(node),
                }
            }
            Event::End(end) => {
                let node = match stack.pop() {
                    Some(node) => node,
                    None => bail!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ),
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => document.children.push(node),
                }
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text.xml_content()?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(node) = stack.last_mut() {
                    match reference.resolve_char_ref()? {
                        Some(resolved) => node.text.push(resolved),
                        None => {
                            let entity = String::from_utf8_lossy(reference.as_ref());
                            node.text.push_str(match entity.as_ref() {
                                "amp" => "&",
                                "lt" => "<",
                                "gt" => ">",
                                "apos" => "'",
                                "quot" => "\"",
                                other => bail!("Unknown entity reference &{other};"),
                            });
                        }
                    }
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text
                        .push_str(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(node) = stack.pop() {
        bail!("Unclosed element <{}>", node.name);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_basic() {
        let document = parse_document(
            r#"<section name="abc"><paragraph>key1</paragraph><tag>t</tag></section>"#,
        )
        .unwrap();
        assert_eq!(document.children.len(), 1);
        let section = &document.children[0];
        assert_eq!(section.name, "section");
        assert_eq!(section.attribute("name"), Some("abc"));
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[0].text, "key1");
    }

    #[test]
    fn test_parse_document_entities_unescaped() {
        let document =
            parse_document(r#"<appendix type="text">a &amp; b &lt;c&gt;</appendix>"#).unwrap();
        assert_eq!(document.children[0].text, "a & b <c>");
    }

    #[test]
    fn test_parse_document_character_references() {
        let document =
            parse_document(r#"<paragraph>snow &#38; ice &#x2603;</paragraph>"#).unwrap();
        assert_eq!(document.children[0].text, "snow & ice ☃");
    }

    #[test]
    fn test_parse_document_unknown_entity_fails() {
        let err = parse_document(r#"<paragraph>a &unknown; b</paragraph>"#).unwrap_err();
        assert!(err.to_string().contains("&unknown;"));
    }

    #[test]
    fn test_parse_document_malformed_fails() {
        assert!(parse_document("<section name=\"abc\"><oops</section>").is_err());
        assert!(parse_document("<section name=\"abc\">").is_err());
    }

    #[test]
    fn test_to_xml_string_roundtrip_shape() {
        let document = parse_document(
            r#"<appendix index="1" type="crafting_recipe">examplemod:thing</appendix>"#,
        )
        .unwrap();
        let serialized = document.children[0].to_xml_string();
        assert_eq!(
            serialized,
            r#"<appendix index="1" type="crafting_recipe">examplemod:thing</appendix>"#
        );
    }
}
