//! Receipt document handling: plain-text extraction and PDF materialization.

mod html;
mod pdf;
mod render;

pub use html::{HtmlTextExtractor, strip_tags};
pub use pdf::PdfTextExtractor;
pub use render::{PAGE_HEIGHT_PT, PAGE_WIDTH_PT, render_html_to_pdf};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Declared format of a receipt document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Pdf,
    /// Anything else; yields no text and no attachment.
    Unsupported,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "html" | "htm" => Self::Html,
            "pdf" => Self::Pdf,
            _ => Self::Unsupported,
        }
    }
}

/// Trait for turning raw document bytes into plain text.
pub trait TextExtractor {
    /// Extract plain text suitable for pattern matching.
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// Extract plain text from a receipt on disk.
///
/// Missing files and unsupported formats yield an empty string. An existing
/// file that cannot be read is an error.
pub fn extract_text(path: &Path) -> Result<String> {
    if !path.exists() {
        debug!("{} does not exist, no text", path.display());
        return Ok(String::new());
    }

    let format = DocumentFormat::from_path(path);
    let text = match format {
        DocumentFormat::Pdf => PdfTextExtractor::new().extract(&fs::read(path)?)?,
        DocumentFormat::Html => HtmlTextExtractor.extract(&fs::read(path)?)?,
        DocumentFormat::Unsupported => String::new(),
    };

    debug!("Extracted {} chars from {} ({:?})", text.len(), path.display(), format);
    Ok(text)
}

/// Make sure the receipt exists as a PDF and return its path.
///
/// HTML receipts are rendered next to the source with a `.pdf` extension.
/// Missing files and unsupported formats yield an empty path.
pub fn materialize(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(PathBuf::new());
    }

    match DocumentFormat::from_path(path) {
        DocumentFormat::Pdf => Ok(path.to_path_buf()),
        DocumentFormat::Html => {
            let html = fs::read_to_string(path)?;
            let dst = path.with_extension("pdf");
            render_html_to_pdf(&html, &dst)?;
            debug!("Rendered {} to {}", path.display(), dst.display());
            Ok(dst)
        }
        DocumentFormat::Unsupported => Ok(PathBuf::new()),
    }
}
