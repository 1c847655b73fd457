// ============================================================
// Typed Errors
// ============================================================
// The application and CLI layers work with anyhow::Result.
// The three boundaries that callers need to inspect get a
// concrete enum instead:
//
//   IngestError — the document could not be turned into text.
//                 Reported to the caller before any question
//                 is resolved.
//   ModelError  — the Q&A model could not produce a span.
//                 Always recovered inside the resolver.
//   RuleError   — a rule table is malformed. Raised once when
//                 the table is built.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

/// Errors raised while turning an upload into a text context.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Extension is not one of the supported document kinds
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    /// File had a supported kind but its content could not be decoded
    #[error("Cannot read document '{source_name}': {reason}")]
    Unreadable { source_name: String, reason: String },

    /// Nothing left after extraction and normalisation
    #[error("No text provided")]
    EmptyDocument,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Stable machine-readable code for structured error reporting.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFormat(_) => "unsupported_format",
            IngestError::Unreadable { .. }    => "unreadable_document",
            IngestError::EmptyDocument        => "empty_document",
            IngestError::Io(_)                => "io_error",
        }
    }
}

/// Errors raised by a Q&A model collaborator.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Question or context is empty")]
    EmptyInput,

    #[error("Tokenisation failed: {0}")]
    Tokenization(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    /// No model was loaded for this run
    #[error("Q&A model unavailable")]
    Unavailable,
}

/// Errors raised while building a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule '{topic}' has an invalid pattern: {source}")]
    InvalidPattern {
        topic:  String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule '{topic}' pattern must have exactly one capture group, found {found}")]
    CaptureGroups { topic: String, found: usize },

    #[error("Rule '{0}' defines no extraction, inference or cleaning")]
    NoAction(String),

    #[error("Rule '{0}' has no trigger phrases")]
    NoTriggers(String),
}
