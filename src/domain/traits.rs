// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The resolver never talks to burn or to a file parser
// directly. It is handed implementations of these traits:
//
//   TextSource → anything that yields one Document
//                (an uploaded file, pasted text)
//   QaModel    → anything that can point at a span of the
//                context that answers a question
//
// Tests inject a deterministic stub QaModel, so the whole
// resolution pipeline runs without a GPU or a checkpoint.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Trait Objects)

use crate::domain::answer::ModelAnswer;
use crate::domain::document::Document;
use crate::error::{IngestError, ModelError};

// ─── TextSource ───────────────────────────────────────────────────────────────
/// Any input that can be turned into a single text context.
///
/// Implementations:
///   - Upload      → file name + raw bytes (txt, pdf, docx)
///   - PastedText  → a description typed by the user
pub trait TextSource {
    fn extract_text(&self) -> Result<Document, IngestError>;
}

// ─── QaModel ──────────────────────────────────────────────────────────────────
/// An extractive question-answering model.
///
/// Implementations:
///   - Inferencer       → burn transformer loaded from a checkpoint
///   - UnavailableModel → always fails (rule-only runs)
pub trait QaModel {
    /// Return the best answer span in `context` and its confidence in [0, 1].
    fn answer(&self, question: &str, context: &str) -> Result<ModelAnswer, ModelError>;

    /// The text this model returns when it predicts "no span"
    /// (the null answer). `None` if the model never emits one.
    fn empty_span_marker(&self) -> Option<&str> {
        None
    }
}

/// Stands in for the Q&A model when none is loaded.
/// Every model-path question degrades to the failure message.
pub struct UnavailableModel;

impl QaModel for UnavailableModel {
    fn answer(&self, _question: &str, _context: &str) -> Result<ModelAnswer, ModelError> {
        Err(ModelError::Unavailable)
    }
}
