// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the user's upload and the model's input.
//
//   upload (.txt / .pdf / .docx) or pasted text
//       │
//       ▼
//   loader        → detects the kind, extracts raw text
//       │
//       ▼
//   Preprocessor  → normalises whitespace, one paragraph per line
//       │
//       ▼
//   Document      → immutable context for every question
//       │
//       ▼
//   Chunker       → overlapping token windows for the Q&A model
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Upload / pasted-text ingestion (docx-rs, pdf-extract)
pub mod loader;

/// Cleans and normalises extracted text
pub mod preprocessor;

/// Splits long token sequences into overlapping windows
pub mod chunker;
