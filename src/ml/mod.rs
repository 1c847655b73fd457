// ============================================================
// Layer 5 — ML / Model Layer (burn)
// ============================================================
// The only layer that imports burn or tokenizers directly.
// Everything above it sees a `dyn QaModel`.
//
//   model.rs      — SpanEncoder: transformer encoder with a
//                   start/end span head
//
//   inferencer.rs — Inferencer: loads a checkpoint, windows
//                   long contexts, picks the best span or
//                   the null answer; implements QaModel
//
// If burn's API changes, only this layer is touched, and the
// rest of the crate is testable without a GPU.
//
// Reference: Burn Book §3 (Building Blocks)
//            Devlin et al. (2019) BERT

/// Transformer encoder with a span prediction head
pub mod model;

/// Checkpoint-backed QaModel implementation
pub mod inferencer;
