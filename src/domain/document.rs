// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// Represents the single project brief a request is about.
// By the time a Document exists, its text has already been
// extracted from PDF/DOCX and normalised — this is the
// immutable context every question is resolved against.
//
// Reference: Rust Book §5 (Structs and Methods)
//            Rust Book §6 (Enums)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::IngestError;

/// The format an upload was detected as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Pasted description or a .txt/.md file
    PlainText,
    Pdf,
    /// .docx (and legacy .doc names, which are read as .docx)
    Docx,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive).
    ///
    /// Example:
    ///   DocumentKind::detect("Brief.PDF") → Ok(DocumentKind::Pdf)
    ///   DocumentKind::detect("sheet.xls") → Err(UnsupportedFormat("xls"))
    pub fn detect(file_name: &str) -> Result<Self, IngestError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" | "md" => Ok(DocumentKind::PlainText),
            "pdf"                 => Ok(DocumentKind::Pdf),
            "docx" | "doc"        => Ok(DocumentKind::Docx),
            _                     => Err(IngestError::UnsupportedFormat(ext)),
        }
    }
}

/// A normalised project brief, built once per request and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The file name, or "<pasted text>" — kept for log lines
    pub source: String,

    pub kind: DocumentKind,

    /// Full normalised text; every line is '\n'-terminated
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, kind: DocumentKind, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            text:   text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_kinds() {
        assert_eq!(DocumentKind::detect("brief.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect("Brief.DOCX").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect("old.doc").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect("notes.txt").unwrap(), DocumentKind::PlainText);
    }

    #[test]
    fn test_detect_rejects_other_kinds() {
        let err = DocumentKind::detect("budget.xlsx").unwrap_err();
        assert_eq!(err.code(), "unsupported_format");

        // No extension at all is also unsupported
        assert!(DocumentKind::detect("README").is_err());
    }
}
