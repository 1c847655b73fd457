// ============================================================
// Answer Resolution — Clean and Infer Transforms
// ============================================================
// Rules never hold closures. Every transform is a value:
//
//   Cleaner   → string -> string, normalises an answer
//               e.g. "NOVADDIX [1]" → "NOVADDIX"
//   Inference → context -> string, derives an answer from
//               keywords anywhere in the document
//               e.g. "flammable" + "toxic" → "High risk: ..."
//
// Because they are data, rule tables can be written in JSON
// and validated when loaded; applying a transform never fails.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)
//            Rust Book §8 (Strings)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A "( ... )" group with no ')' inside
static PARENTHESISED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("literal pattern compiles"));

// ─── Cleaner ──────────────────────────────────────────────────────────────────
/// A pure text normalisation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cleaner {
    /// Trim surrounding whitespace
    Trim,

    /// Keep what follows the last ':' (trimmed); no-op without ':'
    ///   "Domain: Energy" → "Energy"
    AfterLastColon,

    /// Drop everything from the first `marker` on, then trim
    ///   marker "[" : "NOVADDIX [ref]" → "NOVADDIX"
    CutAt { marker: String },

    /// Remove every "( ... )" group, then trim
    ///   "Solvent extraction (patented)" → "Solvent extraction"
    StripParenthesised,

    /// Open a parenthesis at every `marker` and close one at the end
    ///   marker "subsidiary of" :
    ///   "NOVADDIX, subsidiary of INNOVX" → "NOVADDIX, (subsidiary of INNOVX)"
    ParenthesiseFrom { marker: String },
}

impl Cleaner {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Cleaner::Trim => text.trim().to_string(),

            Cleaner::AfterLastColon => match text.rsplit_once(':') {
                Some((_, tail)) => tail.trim().to_string(),
                None            => text.to_string(),
            },

            Cleaner::CutAt { marker } => match text.find(marker.as_str()) {
                Some(idx) => text[..idx].trim().to_string(),
                None      => text.trim().to_string(),
            },

            Cleaner::StripParenthesised => {
                PARENTHESISED.replace_all(text, "").trim().to_string()
            }

            Cleaner::ParenthesiseFrom { marker } => {
                if text.contains(marker.as_str()) {
                    format!("{})", text.replace(marker.as_str(), &format!("({marker}")))
                } else {
                    text.to_string()
                }
            }
        }
    }
}

/// Apply a list of cleaners left to right.
pub fn clean_all(cleaners: &[Cleaner], text: &str) -> String {
    cleaners
        .iter()
        .fold(text.to_string(), |acc, c| c.apply(&acc))
}

// ─── Inference ────────────────────────────────────────────────────────────────
/// One keyword test of an inference cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordBranch {
    /// Every keyword must appear somewhere in the context
    pub all_of: Vec<String>,

    /// Match keywords against the raw context instead of
    /// its lowercased form (e.g. the unit "ZB")
    #[serde(default)]
    pub case_sensitive: bool,

    pub answer: String,
}

impl KeywordBranch {
    fn matches(&self, context: &str, lowered: &str) -> bool {
        self.all_of.iter().all(|kw| {
            if self.case_sensitive {
                context.contains(kw.as_str())
            } else {
                lowered.contains(&kw.to_lowercase())
            }
        })
    }
}

/// A document-wide heuristic: the first branch whose keywords
/// are all present wins, otherwise `otherwise`.
/// No branches at all makes it a fixed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    #[serde(default)]
    pub branches: Vec<KeywordBranch>,
    pub otherwise: String,
}

impl Inference {
    /// Always answers with `answer`.
    #[cfg(test)]
    pub fn fixed(answer: impl Into<String>) -> Self {
        Self { branches: Vec::new(), otherwise: answer.into() }
    }

    pub fn infer(&self, context: &str) -> String {
        let lowered = context.to_lowercase();
        self.branches
            .iter()
            .find(|b| b.matches(context, &lowered))
            .map(|b| b.answer.clone())
            .unwrap_or_else(|| self.otherwise.clone())
    }
}
