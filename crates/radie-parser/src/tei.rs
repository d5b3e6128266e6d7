//! TEI XML text recovery using quick-xml
//!
//! Collects every text node below a paragraph element, regardless of
//! namespace prefix, and joins them into one normalized string. Broken
//! markup never fails the parse: reading stops at the first syntax error
//! and whatever was collected up to that point is returned.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::{
    normalize_whitespace, DocumentParseMetadata, DocumentParser, FileType, ParsedDocument,
    ParserError, Result,
};

/// Local name of the paragraph element
const PARAGRAPH: &[u8] = b"p";

/// Text recovered from a TEI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeiText {
    /// Normalized paragraph text
    pub text: String,
    /// Number of paragraph elements opened
    pub paragraph_count: usize,
    /// Number of non-empty text nodes kept
    pub text_node_count: usize,
    /// Syntax error that stopped reading, if any
    pub error: Option<String>,
}

/// Recover paragraph text from TEI XML
pub fn tei_to_text(xml: &str) -> TeiText {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut nodes: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut paragraph_count = 0usize;
    let mut error = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == PARAGRAPH {
                    depth += 1;
                    paragraph_count += 1;
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == PARAGRAPH {
                    depth = depth.saturating_sub(1);
                }
            }
            Ok(Event::Text(t)) if depth > 0 => {
                let text = match t.unescape() {
                    Ok(text) => text.into_owned(),
                    // unknown entity: keep the raw text
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                push_node(&mut nodes, text);
            }
            Ok(Event::CData(c)) if depth > 0 => {
                let bytes = c.into_inner();
                push_node(&mut nodes, String::from_utf8_lossy(&bytes).into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(
                    position = reader.buffer_position(),
                    "TEI syntax error, keeping recovered text: {}", e
                );
                error = Some(e.to_string());
                break;
            }
        }
    }

    TeiText {
        text: normalize_whitespace(&nodes.join(" ")),
        paragraph_count,
        text_node_count: nodes.len(),
        error,
    }
}

fn push_node(nodes: &mut Vec<String>, text: String) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        nodes.push(trimmed.to_string());
    }
}

/// TEI document parser
pub struct TeiParser;

impl TeiParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TeiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for TeiParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let xml: Cow<'_, str> = String::from_utf8_lossy(&bytes);
        let recovered = tei_to_text(&xml);

        Ok(ParsedDocument::new(path.display().to_string(), FileType::Tei)
            .with_content(recovered.text)
            .with_metadata(DocumentParseMetadata {
                paragraph_count: recovered.paragraph_count,
                text_node_count: recovered.text_node_count,
                recovered_error: recovered.error,
            }))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Tei]
    }
}

// ============================================================================
// Tests
// ============================================================================
