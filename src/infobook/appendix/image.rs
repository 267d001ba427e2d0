//! Image appendices: mod-relative resource paths copied into the output.

use super::{Appendix, AppendixHandler};
use crate::parse::XmlNode;
use crate::resource::ResourceHandler;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::rc::Rc;

/// Handles image appendices.
pub struct AppendixHandlerImage {
    resources: Rc<ResourceHandler>,
}

impl AppendixHandlerImage {
    pub fn new(resources: Rc<ResourceHandler>) -> Self {
        Self { resources }
    }
}

impl AppendixHandler for AppendixHandlerImage {
    fn create_appendix(&self, data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
        let resource_path = data.text.trim();
        let full_path = self.resources.expand_resource_path(resource_path)?;
        let file_name = resource_path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("Invalid image resource path '{resource_path}'"))?
            .to_owned();
        let width: u32 = data
            .attribute("width")
            .context("Image appendix requires a width attribute")?
            .parse()?;
        let height: u32 = data
            .attribute("height")
            .context("Image appendix requires a height attribute")?
            .parse()?;
        Ok(Box::new(ImageAppendix {
            full_path,
            file_name,
            width,
            height,
        }))
    }
}

struct ImageAppendix {
    full_path: PathBuf,
    file_name: String,
    width: u32,
    height: u32,
}

impl Appendix for ImageAppendix {
    fn to_html(
        &self,
        _ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        _serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        let url = files.write(&self.file_name, &self.full_path)?;
        Ok(templates::image(&url, self.width, self.height))
    }
}
