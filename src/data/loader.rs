// ============================================================
// Layer 4 — Document Ingestion
// ============================================================
// Turns what the user supplied into one normalised Document:
//
//   Upload      → file name + bytes; kind detected from the
//                 extension (txt / pdf / docx)
//   PastedText  → a project description typed directly
//
// How .docx files work:
//   A .docx file is a ZIP archive of XML. docx-rs parses it
//   into a typed tree:
//     Document → Paragraph → Run → Text
//   Runs of one paragraph are concatenated, paragraphs become
//   lines.
//
// PDF text comes from pdf-extract, page after page.
//
// Every path ends in the Preprocessor, and an empty result is
// an error: questions are never resolved against nothing.
//
// Reference: docx-rs crate documentation
//            pdf-extract crate documentation
//            Rust Book §9 (Error Handling)

use docx_rs::read_docx;
use std::{fs, path::Path};

use crate::data::preprocessor::Preprocessor;
use crate::domain::document::{Document, DocumentKind};
use crate::domain::traits::TextSource;
use crate::error::IngestError;

// ─── Upload ───────────────────────────────────────────────────────────────────
/// An uploaded file, held in memory.
pub struct Upload {
    name:  String,
    bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a file from disk. The kind is checked before reading
    /// so an unsupported file fails without touching its content.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        DocumentKind::detect(&name)?;
        let bytes = fs::read(path)?;
        Ok(Self::new(name, bytes))
    }
}

impl TextSource for Upload {
    fn extract_text(&self) -> Result<Document, IngestError> {
        let kind = DocumentKind::detect(&self.name)?;

        let raw = match kind {
            DocumentKind::PlainText => String::from_utf8(self.bytes.clone())
                .map_err(|e| self.unreadable(e.to_string()))?,
            DocumentKind::Pdf  => pdf_text(&self.bytes).map_err(|r| self.unreadable(r))?,
            DocumentKind::Docx => docx_text(&self.bytes).map_err(|r| self.unreadable(r))?,
        };

        let doc = normalise(&self.name, kind, &raw)?;
        tracing::info!(
            "Extracted {} chars from '{}' ({:?})",
            doc.text.len(),
            doc.source,
            doc.kind
        );
        Ok(doc)
    }
}

impl Upload {
    fn unreadable(&self, reason: String) -> IngestError {
        IngestError::Unreadable { source_name: self.name.clone(), reason }
    }
}

// ─── PastedText ───────────────────────────────────────────────────────────────
/// A project description supplied as text instead of a file.
pub struct PastedText(pub String);

impl TextSource for PastedText {
    fn extract_text(&self) -> Result<Document, IngestError> {
        normalise("<pasted text>", DocumentKind::PlainText, &self.0)
    }
}

fn normalise(source: &str, kind: DocumentKind, raw: &str) -> Result<Document, IngestError> {
    let text = Preprocessor::new().clean(raw);
    if text.is_empty() {
        return Err(IngestError::EmptyDocument);
    }
    Ok(Document::new(source, kind, text))
}

// ─── Format readers ───────────────────────────────────────────────────────────
fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| format!("pdf-extract: {e:?}"))
}

/// Walk the docx tree and return one line per non-empty paragraph.
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    use docx_rs::DocumentChild;

    let docx = read_docx(bytes).map_err(|e| format!("docx-rs: {e:?}"))?;

    let lines: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            // Tables, section properties, bookmarks: not part of the flat text
            _ => None,
        })
        .filter(|line| !line.trim().is_empty())
        .collect();

    Ok(lines.join("\n"))
}

/// Concatenate the text runs of one paragraph (Paragraph → Run → Text).
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    use docx_rs::{ParagraphChild, RunChild};

    para.children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
        .flat_map(|run| run.children.iter())
        .filter_map(|rc| match rc {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}
