//! Document boundary — turns uploaded files and form fields into plain text.
//!
//! Supported uploads: PDF (page text concatenated), DOCX (paragraph text from
//! `word/document.xml` joined with newlines), TXT (strict UTF-8). Everything
//! else is rejected before any remote call.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;

/// File-type tag for an ingested document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Txt,
    /// Raw text from a form field — no decoding needed.
    FormText,
}

impl SourceKind {
    /// Sniffs the kind from the uploaded filename, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, AppError> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(SourceKind::Pdf),
            "docx" => Ok(SourceKind::Docx),
            "txt" => Ok(SourceKind::Txt),
            _ => Err(AppError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Plain text extracted from one uploaded file or form field.
/// Request-scoped; discarded after the response is sent.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub content: String,
    pub source_kind: SourceKind,
}

impl RawDocument {
    pub fn from_text(content: String) -> Self {
        Self {
            content,
            source_kind: SourceKind::FormText,
        }
    }

    /// Decodes file bytes into text according to the source kind.
    pub fn from_bytes(source_kind: SourceKind, data: &[u8]) -> Result<Self, AppError> {
        let content = match source_kind {
            SourceKind::Pdf => pdf_extract::extract_text_from_mem(data)
                .map_err(|e| AppError::Validation(format!("Could not read PDF file: {e}")))?,
            SourceKind::Docx => extract_docx_text(data)
                .map_err(|e| AppError::Validation(format!("Could not read DOCX file: {e}")))?,
            SourceKind::Txt | SourceKind::FormText => String::from_utf8(data.to_vec())
                .map_err(|_| {
                    AppError::Validation("Text file is not valid UTF-8".to_string())
                })?,
        };

        Ok(Self {
            content,
            source_kind,
        })
    }

    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Pulls paragraph text out of the DOCX main document part. One line per
/// `w:p` element, empty paragraphs dropped.
fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut paragraphs = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        paragraphs.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
