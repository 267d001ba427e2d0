//! Ad appendices rendered from the configured ad-network settings.

use super::Appendix;
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::Result;

/// An appendix with an ad.
///
/// Appended to leaf pages by the serializer when ad settings are
/// present in the config; renders without the standard appendix box.
#[derive(Default)]
pub struct AppendixAd;

impl Appendix for AppendixAd {
    fn skip_wrapper(&self) -> bool {
        true
    }

    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        _files: &mut FileWriter,
        _serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        Ok(match &ctx.config.google_adsense {
            Some(adsense) => templates::ad(&adsense.client, &adsense.slot),
            None => String::new(),
        })
    }
}
