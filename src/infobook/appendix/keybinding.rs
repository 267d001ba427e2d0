//! Keybinding appendices: a named key label from the keybinding store.

use super::{Appendix, AppendixHandler};
use crate::parse::XmlNode;
use crate::resource::ResourceHandler;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::Result;
use std::rc::Rc;

/// Handles keybinding appendices.
pub struct AppendixHandlerKeybinding {
    resources: Rc<ResourceHandler>,
}

impl AppendixHandlerKeybinding {
    pub fn new(resources: Rc<ResourceHandler>) -> Self {
        Self { resources }
    }
}

impl AppendixHandler for AppendixHandlerKeybinding {
    fn create_appendix(&self, data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
        let id = data.text.trim().to_owned();
        // Unknown keybinding ids fail at parse time, not at render time.
        let key = self.resources.get_keybinding(&id)?.to_owned();
        Ok(Box::new(KeybindingAppendix { id, key }))
    }
}

struct KeybindingAppendix {
    id: String,
    key: String,
}

impl Appendix for KeybindingAppendix {
    fn name(&self, ctx: &SerializeContext<'_>) -> Result<Option<String>> {
        let key = format!("gui.{}.keybinding", ctx.config.mod_id);
        Ok(Some(ctx.translate_formatted(&key)?))
    }

    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        _files: &mut FileWriter,
        _serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        let name = ctx.translate_formatted(&self.id)?;
        Ok(templates::keybinding(&name, &self.key))
    }
}
