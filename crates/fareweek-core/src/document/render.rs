//! Render HTML receipts into a single-page PDF.
//!
//! Pages are 8.5in x 33in so a typical receipt fits on one. Longer receipts
//! continue on further pages of the same size. Only the text survives: block-level tags start new lines, everything
//! else collapses into single spaces, and the result is set in Helvetica.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use regex::Regex;
use tracing::{debug, trace};

use super::Result;
use crate::error::DocumentError;

/// Page width in points (8.5in).
pub const PAGE_WIDTH_PT: i64 = 612;
/// Page height in points (33in).
pub const PAGE_HEIGHT_PT: i64 = 2376;

const MARGIN_PT: i64 = 36;
const FONT_SIZE_PT: i64 = 10;
const LEADING_PT: i64 = 12;
const MAX_LINE_CHARS: usize = 96;
/// Lines that fit between the top and bottom margins of one page.
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT_PT - 2 * MARGIN_PT) / LEADING_PT) as usize;

lazy_static! {
    static ref INVISIBLE: Regex =
        Regex::new(r"(?is)<(?:style|script|head)\b[^>]*>.*?</(?:style|script|head)\s*>").unwrap();
    static ref BLOCK_BREAK: Regex =
        Regex::new(r"(?i)<br\s*/?>|</(?:p|div|tr|li|h[1-6]|table|section|article)\s*>").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Render `html` as a PDF at `dst`.
pub fn render_html_to_pdf(html: &str, dst: &Path) -> Result<()> {
    let lines = html_to_lines(html);
    let bytes = build_pdf(&lines).map_err(|reason| DocumentError::Render {
        path: dst.display().to_string(),
        reason,
    })?;
    fs::write(dst, bytes)?;
    Ok(())
}

/// Break HTML into printable lines.
fn html_to_lines(html: &str) -> Vec<String> {
    let visible = INVISIBLE.replace_all(html, " ");
    let broken = BLOCK_BREAK.replace_all(&visible, "\n");
    let text = decode_entities(&ANY_TAG.replace_all(&broken, " "));

    let mut lines = Vec::new();
    for raw in text.lines() {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            continue;
        }
        lines.extend(wrap(&to_printable(&line), MAX_LINE_CHARS));
    }

    trace!("Rendering {} lines", lines.len());
    lines
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Standard Type1 fonts only cover ASCII reliably.
fn to_printable(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split(' ') {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        while current.len() > width {
            let rest = current.split_off(width);
            out.push(std::mem::replace(&mut current, rest));
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn build_pdf(lines: &[String]) -> std::result::Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&[] as &[String]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };
    if chunks.len() > 1 {
        debug!("Receipt has {} lines, rendering {} pages", lines.len(), chunks.len());
    }

    let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let content = page_content(chunk);
        let encoded = content.encode().map_err(|e| e.to_string())?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(kids.len() as i64),
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH_PT),
            Object::Integer(PAGE_HEIGHT_PT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Text operations for one page, starting at the top margin.
fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE_PT)]),
        Operation::new("TL", vec![Object::Integer(LEADING_PT)]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(MARGIN_PT),
                Object::Integer(PAGE_HEIGHT_PT - MARGIN_PT - FONT_SIZE_PT),
            ],
        ),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    Content { operations }
}
