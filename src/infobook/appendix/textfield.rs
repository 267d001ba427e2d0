//! Text field appendices: literal prose rendered with preserved layout.

use super::{Appendix, AppendixHandler};
use crate::parse::XmlNode;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Context, Result};

/// Handles text field appendices.
#[derive(Default)]
pub struct AppendixHandlerTextfield;

impl AppendixHandler for AppendixHandlerTextfield {
    fn create_appendix(&self, data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
        let contents = escape_text(data.text.trim());
        let scale: f32 = match data.attribute("scale") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid textfield scale attribute '{raw}'"))?,
            None => 1.0,
        };
        Ok(Box::new(TextfieldAppendix { contents, scale }))
    }
}

/// Escape markup and convert whitespace to HTML equivalents.
fn escape_text(text: &str) -> String {
    templates::escape_html(text)
        .replace(' ', "&nbsp;")
        .replace('\n', "<br />")
}

struct TextfieldAppendix {
    contents: String,
    scale: f32,
}

impl Appendix for TextfieldAppendix {
    fn to_html(
        &self,
        _ctx: &SerializeContext<'_>,
        _files: &mut FileWriter,
        _serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        Ok(templates::textfield(&self.contents, self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_markup_and_whitespace() {
        assert_eq!(
            escape_text("a <b>\nc & d"),
            "a&nbsp;&lt;b&gt;<br />c&nbsp;&amp;&nbsp;d"
        );
    }
}
