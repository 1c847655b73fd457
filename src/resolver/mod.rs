// ============================================================
// Layer 3b — Answer Resolution
// ============================================================
// The decision logic of the system: for each question, use a
// deterministic rule or fall back to the Q&A model, then gate
// the model's answer on confidence.
//
//   transforms.rs      — Cleaner / Inference values
//   rule_table.rs      — Rule, Strategy, RuleTable lookup
//   builtin.rs         — the default project-brief rules
//   answer_resolver.rs — the dispatch and confidence gate
//
// Like the domain layer this code never touches burn, files
// (except loading a rule table) or the CLI, so every rule is
// testable with a stub model.

pub mod transforms;

pub mod rule_table;

pub mod builtin;

pub mod answer_resolver;
