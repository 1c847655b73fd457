// ============================================================
// Answer Resolution — Rule Table
// ============================================================
// An ordered list of topic rules that override the Q&A model.
//
// A question selects a rule when its lowercased text contains
// one of the rule's trigger phrases. Rules are checked in
// table order and the FIRST match wins — rules never merge.
//
// What a matched rule does is a tagged variant:
//
//   Extract        pattern, optional cleaners
//   Infer          keyword heuristic over the whole document
//   ExtractOrInfer pattern first, heuristic if it misses
//   CleanOnly      nothing by itself; cleans the model answer
//
// Tables are built from RuleSpec values (serde), either the
// built-in ones or a JSON file, and validated once:
//   - at least one trigger phrase
//   - at least one of extract / infer / clean
//   - an extract pattern has exactly one capture group
//
// Reference: Rust Book §6 (Enums), §8 (Vectors)
//            regex crate documentation (Captures)

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::RuleError;
use crate::resolver::transforms::{clean_all, Cleaner, Inference};

// ─── RuleSpec ─────────────────────────────────────────────────────────────────
/// The serialisable description of one rule.
///
/// JSON example:
///   {
///     "topic": "capacity",
///     "triggers": ["production capacity", "capacity"],
///     "extract": "Production Capacity:\\s*(.*?)\\s*\\n",
///     "clean": [{ "kind": "trim" }]
///   }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub topic:    String,
    pub triggers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clean: Vec<Cleaner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infer: Option<Inference>,
}

// ─── Strategy ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub enum Strategy {
    Extract {
        pattern: Regex,
        clean:   Vec<Cleaner>,
    },
    Infer(Inference),
    ExtractOrInfer {
        pattern: Regex,
        clean:   Vec<Cleaner>,
        infer:   Inference,
    },
    CleanOnly(Vec<Cleaner>),
}

impl Strategy {
    pub fn pattern(&self) -> Option<&Regex> {
        match self {
            Strategy::Extract { pattern, .. }
            | Strategy::ExtractOrInfer { pattern, .. } => Some(pattern),
            _ => None,
        }
    }

    /// Cleaners for extracted text and for the model's answer.
    /// Empty for pure inference rules.
    pub fn cleaners(&self) -> &[Cleaner] {
        match self {
            Strategy::Extract { clean, .. }
            | Strategy::ExtractOrInfer { clean, .. }
            | Strategy::CleanOnly(clean) => clean,
            Strategy::Infer(_) => &[],
        }
    }

    pub fn inference(&self) -> Option<&Inference> {
        match self {
            Strategy::Infer(inf) | Strategy::ExtractOrInfer { infer: inf, .. } => Some(inf),
            _ => None,
        }
    }

    /// Short label for logs and the `rules` listing.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Extract { .. }        => "extract",
            Strategy::Infer(_)              => "infer",
            Strategy::ExtractOrInfer { .. } => "extract+infer",
            Strategy::CleanOnly(_)          => "clean-only",
        }
    }
}

// ─── Rule ─────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct Rule {
    pub topic:    String,
    /// Lowercase substrings matched against the lowercased question
    pub triggers: Vec<String>,
    pub strategy: Strategy,
}

impl Rule {
    /// Validate a spec and compile its pattern.
    pub fn from_spec(spec: RuleSpec) -> Result<Self, RuleError> {
        let RuleSpec { topic, triggers, extract, clean, infer } = spec;

        let triggers: Vec<String> = triggers
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if triggers.is_empty() {
            return Err(RuleError::NoTriggers(topic));
        }

        let pattern = match extract {
            Some(src) => Some(compile_pattern(&topic, &src)?),
            None      => None,
        };

        let strategy = match (pattern, infer) {
            (Some(pattern), None)        => Strategy::Extract { pattern, clean },
            (Some(pattern), Some(infer)) => Strategy::ExtractOrInfer { pattern, clean, infer },
            // Cleaners on an inference-only rule would never run
            (None, Some(infer))          => Strategy::Infer(infer),
            (None, None) if !clean.is_empty() => Strategy::CleanOnly(clean),
            (None, None)                 => return Err(RuleError::NoAction(topic)),
        };

        Ok(Self { topic, triggers, strategy })
    }

    /// True if any trigger phrase occurs in the (already lowercased) question.
    pub fn matches(&self, lowered_question: &str) -> bool {
        self.triggers.iter().any(|t| lowered_question.contains(t.as_str()))
    }

    /// Run the extraction pattern over the context.
    /// Returns the first match's capture group, cleaned if the rule
    /// has cleaners. `None` when there is no pattern or no match.
    pub fn extract(&self, context: &str) -> Option<String> {
        let pattern = self.strategy.pattern()?;
        let raw     = pattern.captures(context)?.get(1)?.as_str();
        let clean   = self.strategy.cleaners();
        if clean.is_empty() {
            Some(raw.to_string())
        } else {
            Some(clean_all(clean, raw))
        }
    }
}

fn compile_pattern(topic: &str, src: &str) -> Result<Regex, RuleError> {
    let pattern = Regex::new(src).map_err(|source| RuleError::InvalidPattern {
        topic: topic.to_string(),
        source,
    })?;

    // captures_len() counts the implicit whole-match group 0
    let groups = pattern.captures_len() - 1;
    if groups != 1 {
        return Err(RuleError::CaptureGroups { topic: topic.to_string(), found: groups });
    }
    Ok(pattern)
}

// ─── RuleTable ────────────────────────────────────────────────────────────────
/// Immutable, ordered rule set shared by every question of a run.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn from_specs(specs: Vec<RuleSpec>) -> Result<Self, RuleError> {
        let rules = specs
            .into_iter()
            .map(Rule::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Load a JSON array of RuleSpec from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read rule file '{}'", path.display()))?;
        let specs: Vec<RuleSpec> = serde_json::from_str(&json)
            .with_context(|| format!("Invalid rule file '{}'", path.display()))?;
        let table = Self::from_specs(specs)
            .with_context(|| format!("Invalid rule in '{}'", path.display()))?;

        tracing::info!("Loaded {} rules from '{}'", table.len(), path.display());
        Ok(table)
    }

    /// First rule, in table order, triggered by the question.
    pub fn find_matching_rule(&self, question: &str) -> Option<&Rule> {
        let lowered = question.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lowered))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(topic: &str, triggers: &[&str]) -> RuleSpec {
        RuleSpec {
            topic:    topic.to_string(),
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            extract:  None,
            clean:    Vec::new(),
            infer:    None,
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = RuleTable::from_specs(vec![
            RuleSpec { infer: Some(Inference::fixed("A")), ..spec("first", &["plant"]) },
            RuleSpec { infer: Some(Inference::fixed("B")), ..spec("second", &["pilot plant"]) },
        ]).unwrap();

        let rule = table.find_matching_rule("Where is the pilot plant?").unwrap();
        assert_eq!(rule.topic, "first");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let table = RuleTable::from_specs(vec![
            RuleSpec { clean: vec![Cleaner::Trim], ..spec("technology", &["Technology"]) },
        ]).unwrap();

        assert!(table.find_matching_rule("WHAT TECHNOLOGY IS USED?").is_some());
        assert!(table.find_matching_rule("Who is the client?").is_none());
    }

    #[test]
    fn test_strategy_variants() {
        let extract = Rule::from_spec(RuleSpec {
            extract: Some(r"Domain: (.+?)\n".into()),
            ..spec("sector", &["sector"])
        }).unwrap();
        assert_eq!(extract.strategy.label(), "extract");

        let both = Rule::from_spec(RuleSpec {
            extract: Some(r"Domain: (.+?)\n".into()),
            infer:   Some(Inference::fixed("x")),
            ..spec("sector", &["sector"])
        }).unwrap();
        assert_eq!(both.strategy.label(), "extract+infer");

        let clean = Rule::from_spec(RuleSpec {
            clean: vec![Cleaner::StripParenthesised],
            ..spec("technology", &["technology"])
        }).unwrap();
        assert_eq!(clean.strategy.label(), "clean-only");
        assert!(clean.extract("anything").is_none());
    }

    #[test]
    fn test_rejects_rule_without_action() {
        let err = Rule::from_spec(spec("empty", &["x"])).unwrap_err();
        assert!(matches!(err, RuleError::NoAction(_)));
    }

    #[test]
    fn test_rejects_rule_without_triggers() {
        let err = Rule::from_spec(RuleSpec {
            infer: Some(Inference::fixed("x")),
            ..spec("silent", &["  "])
        }).unwrap_err();
        assert!(matches!(err, RuleError::NoTriggers(_)));
    }

    #[test]
    fn test_rejects_wrong_capture_group_count() {
        let none = Rule::from_spec(RuleSpec {
            extract: Some("Domain: .+".into()),
            ..spec("sector", &["sector"])
        }).unwrap_err();
        assert!(matches!(none, RuleError::CaptureGroups { found: 0, .. }));

        let two = Rule::from_spec(RuleSpec {
            extract: Some("(a)(b)".into()),
            ..spec("sector", &["sector"])
        }).unwrap_err();
        assert!(matches!(two, RuleError::CaptureGroups { found: 2, .. }));

        let bad = Rule::from_spec(RuleSpec {
            extract: Some("(unclosed".into()),
            ..spec("sector", &["sector"])
        }).unwrap_err();
        assert!(matches!(bad, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_extract_takes_first_match() {
        let rule = Rule::from_spec(RuleSpec {
            extract: Some(r"Capacity:\s*(.*?)\s*\n".into()),
            ..spec("capacity", &["capacity"])
        }).unwrap();
        let ctx = "Capacity: 75 T/D \nCapacity: 5 T/W\n";
        assert_eq!(rule.extract(ctx).as_deref(), Some("75 T/D"));
        assert_eq!(rule.extract("no capacity line"), None);
    }

    #[test]
    fn test_specs_parse_from_json() {
        let json = r#"[
            {
              "topic": "capacity",
              "triggers": ["capacity"],
              "extract": "Production Capacity:\\s*(.*?)\\s*\\n",
              "clean": [{ "kind": "trim" }]
            },
            {
              "topic": "safety",
              "triggers": ["safety"],
              "infer": {
                "branches": [{ "all_of": ["toxic"], "answer": "Toxic" }],
                "otherwise": "None"
              }
            }
        ]"#;
        let specs: Vec<RuleSpec> = serde_json::from_str(json).unwrap();
        let table = RuleTable::from_specs(specs).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].strategy.label(), "extract");
        assert_eq!(table.rules()[1].strategy.label(), "infer");
    }
}
