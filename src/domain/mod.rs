// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that define what the system
// talks about: a project brief, the questions asked about it,
// the model's raw span prediction, and the ordered answers.
//
// Rules for this layer:
//   - NO burn or tokenizers types
//   - NO file I/O
//   - NO clap types (the CLI converts into these)
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// The normalised project brief and its detected format
pub mod document;

/// English / French question sets
pub mod language;

/// ModelAnswer (raw span) and Analysis (ordered results)
pub mod answer;

/// TextSource and QaModel — the two collaborator seams
pub mod traits;
