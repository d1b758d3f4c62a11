//! HTML receipt text extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Result, TextExtractor};

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Extracts text from HTML receipts by blanking out markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTextExtractor;

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let html = String::from_utf8_lossy(data);
        Ok(strip_tags(html.trim_end()))
    }
}

/// Replace every tag, attributes included, with a single space.
///
/// Tags become a space rather than nothing so that text separated only by
/// a tag boundary (`<b>Jan</b>15`) stays separated.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, " ").into_owned()
}
