//! # Document Assembly Module
//!
//! Collects one section per recognized image and turns the finished list
//! into a `.docx` package.
//!
//! A [`DocumentBuilder`] is an explicit value threaded through the batch
//! loop. [`DocumentBuilder::serialize`] consumes it, so a document can only
//! be written once and never grows after it has been exported.

pub mod docx;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::AppResult;

/// MIME type of the exported document
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Name under which the exported document is offered
pub const OUTPUT_FILENAME: &str = "output.docx";

/// Split text the way Python's `str.splitlines` does.
///
/// Recognized boundaries are `\n`, `\r\n`, `\r`, `\x0b`, `\x0c`, `\x1c`,
/// `\x1d`, `\x1e`, `\u{85}`, `\u{2028}` and `\u{2029}`. A trailing boundary
/// does not produce a final empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let is_boundary = matches!(
            ch,
            '\n' | '\r'
                | '\x0b'
                | '\x0c'
                | '\x1c'
                | '\x1d'
                | '\x1e'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        );
        if !is_boundary {
            continue;
        }

        lines.push(&text[start..idx]);
        let mut end = idx + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                end = next_idx + 1;
            }
        }
        start = end;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Whitespace as OCR output treats it: Unicode white space plus the
/// `\x1c`..=`\x1f` separator controls.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// Whether a line still shows something once it is written to the document.
///
/// Characters XML cannot carry are dropped on export, so they do not count.
pub fn has_visible_text(line: &str) -> bool {
    line.chars().any(|c| docx::is_xml_char(c) && !is_space(c))
}

/// One image's worth of content: a level-2 heading and its text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Lines with visible content, in original order and untrimmed
    pub paragraphs: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, text: &str) -> Self {
        let paragraphs = split_lines(text)
            .into_iter()
            .filter(|line| has_visible_text(line))
            .map(str::to_string)
            .collect();

        Self {
            title: title.into(),
            paragraphs,
        }
    }
}

/// The serialized document, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn docx(bytes: Vec<u8>) -> Self {
        Self {
            filename: OUTPUT_FILENAME,
            content_type: DOCX_MIME,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Accumulates sections in the order they are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBuilder {
    sections: Vec<Section>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading for `title`, one paragraph per non-blank line of
    /// `text`, and a page break.
    pub fn add_section(&mut self, title: &str, text: &str) {
        let section = Section::new(title, text);
        debug!(
            title = %section.title,
            paragraphs = section.paragraphs.len(),
            "Added document section"
        );
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Write the finished document, stamped with the current time.
    pub fn serialize(self) -> AppResult<OutputArtifact> {
        self.serialize_at(Utc::now())
    }

    /// Write the finished document with an explicit creation timestamp.
    pub fn serialize_at(self, created: DateTime<Utc>) -> AppResult<OutputArtifact> {
        let bytes = docx::write_package(&self.sections, created)?;
        Ok(OutputArtifact::docx(bytes))
    }
}
