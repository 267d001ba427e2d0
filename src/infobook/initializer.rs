//! Book initialization: parsing, sub-book injection and the generated
//! tag index section.

use super::appendix::{AppendixHandler, AppendixTagIndex};
use super::{InfoBook, Section};
use crate::config::{BookConfig, ConfigError, SectionInjection};
use crate::parse::XmlInfoBookParser;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Holds everything needed to construct an [`InfoBook`].
pub struct InfoBookInitializer {
    base_dir: PathBuf,
    sections_file: PathBuf,
    mod_id: String,
    injections: HashMap<String, Vec<SectionInjection>>,
    parser: XmlInfoBookParser,
}

impl fmt::Debug for InfoBookInitializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfoBookInitializer")
            .field("base_dir", &self.base_dir)
            .field("sections_file", &self.sections_file)
            .field("mod_id", &self.mod_id)
            .field("injections", &self.injections)
            .finish_non_exhaustive()
    }
}

impl InfoBookInitializer {
    /// Validate the config and prepare an initializer.
    ///
    /// Missing required fields are configuration errors raised before
    /// any parsing begins.
    pub fn new(config: &BookConfig) -> Result<Self, ConfigError> {
        if config.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("base_dir"));
        }
        if config.sections_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("sections_file"));
        }
        if config.mod_id.is_empty() {
            return Err(ConfigError::MissingField("mod_id"));
        }
        Ok(Self {
            base_dir: config.base_dir.clone(),
            sections_file: config.sections_file.clone(),
            mod_id: config.mod_id.clone(),
            injections: config.section_injections.clone(),
            parser: XmlInfoBookParser::new(),
        })
    }

    /// Register an appendix handler for the given type.
    pub fn register_appendix_handler(
        &mut self,
        appendix_type: impl Into<String>,
        handler: Box<dyn AppendixHandler>,
    ) -> Result<()> {
        self.parser.register_appendix_handler(appendix_type, handler)
    }

    /// Parse the base book, inject configured sub-books, and append the
    /// generated tag index section.
    pub fn initialize(&self) -> Result<InfoBook> {
        let mut book = self
            .parser
            .parse(&self.base_dir.join(&self.sections_file), &self.mod_id)?;

        for (target_key, injections) in &self.injections {
            for injection in injections {
                let sub_book = self
                    .parser
                    .parse(
                        &self.base_dir.join(&injection.sections_file),
                        &injection.mod_id,
                    )
                    .with_context(|| {
                        format!("Failed to parse sub-book for mod '{}'", injection.mod_id)
                    })?;
                book.inject(target_key, sub_book)?;
            }
        }

        book.push_root_subsection(self.create_tag_index_section());
        Ok(book)
    }

    /// The synthesized tag index section, keyed deterministically by the
    /// owning mod id.
    fn create_tag_index_section(&self) -> Section {
        let mut section = Section::new(
            format!("info_book.{}.tag_index", self.mod_id),
            self.mod_id.clone(),
        );
        section.appendices.push(Some(Box::new(AppendixTagIndex)));
        section
    }
}
