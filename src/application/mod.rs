// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal: answer the
// project-brief questions about a document.
//
// Rules for this layer:
//   - No tensor code (Layer 5)
//   - No printing (Layer 1)
//   - No rule logic (Layer 3b)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Ingest → resolve every question → ordered answers
pub mod analyze_use_case;
