// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed pieces the Q&A model needs at start-up:
//
//   checkpoint.rs      — architecture (train_config.json) and
//                        weights (burn CompactRecorder)
//
//   tokenizer_store.rs — the tokenizer.json saved with the
//                        checkpoint, checked for the special
//                        token ids the encoder expects
//
// Both are read once per process, before any question is
// resolved.
//
// Reference: Burn Book §5 (Checkpointing)
//            Rust Book §9 (Error Handling with anyhow)

/// Model architecture and weight loading
pub mod checkpoint;

/// Tokenizer loading
pub mod tokenizer_store;
