// ============================================================
// Answer Resolution — AnswerResolver
// ============================================================
// Produces exactly one answer string per (question, context).
//
// Dispatch, in order:
//   1. Find the first rule triggered by the question.
//   2. Rule found:
//        a. pattern matches the context → cleaned capture
//        b. rule has an inference       → inference(context)
//           (no model call, no threshold)
//        c. neither                     → fall through
//   3. Ask the Q&A model. A model error becomes the failure
//      message; it never leaves this function.
//   4. Matched rule with cleaners → clean the model's answer.
//   5. Confidence gate: low score, empty answer, or the model's
//      empty-span marker → the not-found message.
//
// The resolver holds no mutable state. Given a deterministic
// model, resolving the same pair twice gives the same answer.
//
// Reference: Rust Book §6 (match), §10 (Trait objects)

use serde::{Deserialize, Serialize};

use crate::domain::answer::Analysis;
use crate::domain::traits::QaModel;
use crate::resolver::rule_table::{Rule, RuleTable};
use crate::resolver::transforms::clean_all;

/// Default minimum model confidence for an answer to be kept.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

// ─── ResolverConfig ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Model answers scoring below this are replaced by `not_found_message`
    pub threshold: f32,

    /// Returned when the model's answer is rejected by the gate
    pub not_found_message: String,

    /// Returned when the model itself fails on the input
    pub model_failure_message: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold:             DEFAULT_THRESHOLD,
            not_found_message:     "Information not found in document".to_string(),
            model_failure_message: "No answer found".to_string(),
        }
    }
}

// ─── AnswerResolver ───────────────────────────────────────────────────────────
pub struct AnswerResolver<'a> {
    rules:  &'a RuleTable,
    model:  &'a dyn QaModel,
    config: ResolverConfig,
}

impl<'a> AnswerResolver<'a> {
    pub fn new(rules: &'a RuleTable, model: &'a dyn QaModel, config: ResolverConfig) -> Self {
        Self { rules, model, config }
    }

    /// Resolve one question against the context. Never fails.
    pub fn resolve(&self, question: &str, context: &str) -> String {
        // ── Steps 1–2: rule layer ─────────────────────────────────────────────
        let rule = self.rules.find_matching_rule(question);

        if let Some(rule) = rule {
            if let Some(answer) = rule.extract(context) {
                tracing::debug!(topic = %rule.topic, "extracted answer from pattern");
                return answer;
            }

            if let Some(inference) = rule.strategy.inference() {
                tracing::debug!(topic = %rule.topic, "answered by inference");
                return inference.infer(context);
            }
        }

        // ── Steps 3–5: model fallback ─────────────────────────────────────────
        self.resolve_with_model(question, context, rule)
    }

    /// Resolve every question in order. Output order follows `questions`.
    pub fn resolve_all<S: AsRef<str>>(&self, questions: &[S], context: &str) -> Analysis {
        let mut analysis = Analysis::new();
        for q in questions {
            let q = q.as_ref();
            analysis.insert(q, self.resolve(q, context));
        }
        analysis
    }

    fn resolve_with_model(&self, question: &str, context: &str, rule: Option<&Rule>) -> String {
        let prediction = match self.model.answer(question, context) {
            Ok(p)  => p,
            Err(e) => {
                tracing::warn!("Q&A model failed on '{}': {}", question, e);
                return self.config.model_failure_message.clone();
            }
        };

        let raw = prediction.text.trim();

        // A rule can supply cleaning without supplying an answer
        let answer = match rule.map(|r| r.strategy.cleaners()) {
            Some(cleaners) if !cleaners.is_empty() => clean_all(cleaners, raw),
            _ => raw.to_string(),
        };
        let answer = answer.trim();

        let is_empty_span = self
            .model
            .empty_span_marker()
            .is_some_and(|marker| raw == marker || answer == marker);

        if prediction.confidence < self.config.threshold || answer.is_empty() || is_empty_span {
            tracing::debug!(
                confidence = prediction.confidence,
                threshold  = self.config.threshold,
                "model answer rejected"
            );
            return self.config.not_found_message.clone();
        }

        tracing::debug!(confidence = prediction.confidence, "model answer accepted");
        answer.to_string()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::domain::answer::ModelAnswer;
    use crate::domain::language::Language;
    use crate::error::ModelError;
    use crate::resolver::builtin::{
        DURATION_FROM_PILOT, DURATION_UNKNOWN, SAFETY_HIGH_RISK, SAFETY_UNKNOWN,
    };
    use crate::resolver::rule_table::RuleSpec;
    use crate::resolver::transforms::{Cleaner, Inference};

    /// Deterministic model: always the same answer, counts its calls.
    struct StubModel {
        reply: Result<ModelAnswer, ModelError>,
        calls: Cell<usize>,
    }

    impl StubModel {
        fn answering(text: &str, confidence: f32) -> Self {
            Self { reply: Ok(ModelAnswer::new(text, confidence)), calls: Cell::new(0) }
        }

        fn failing() -> Self {
            Self { reply: Err(ModelError::EmptyInput), calls: Cell::new(0) }
        }
    }

    impl QaModel for StubModel {
        fn answer(&self, _q: &str, _c: &str) -> Result<ModelAnswer, ModelError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }

        fn empty_span_marker(&self) -> Option<&str> {
            Some("[CLS]")
        }
    }

    const BRIEF: &str = "Project Outline:\n\
        The Customer is NOVADDIX, subsidiary of INNOVX.\n\
        The process has been tested in a pilot plant at Jorf Lasfar with a capacity of 5T/Week.\n\
        Domain: Industrial - Chemical.\n\
        Product Class: Flammable and Toxic Products.\n";

    fn english() -> RuleTable {
        RuleTable::builtin(Language::English).unwrap()
    }

    #[test]
    fn test_extract_rule_ignores_model() {
        let rules = english();
        let model = StubModel::answering("something else", 0.99);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        let answer = r.resolve("What is the sector of the project?", BRIEF);
        assert_eq!(answer, "Industrial - Chemical.");
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn test_extract_without_cleaner_returns_capture_verbatim() {
        let rules = RuleTable::from_specs(vec![RuleSpec {
            topic:    "ref".into(),
            triggers: vec!["reference".into()],
            extract:  Some(r"Ref:(.*)\n".into()),
            clean:    Vec::new(),
            infer:    None,
        }]).unwrap();
        let model = StubModel::answering("x", 1.0);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("Project reference?", "Ref:  A-12 \n"), "  A-12 ");
    }

    #[test]
    fn test_safety_inference_flags_flammable_and_toxic() {
        let rules = english();
        let model = StubModel::answering("low risk", 0.99);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("What are the safety concerns?", BRIEF), SAFETY_HIGH_RISK);
        assert_eq!(
            r.resolve("What are the safety concerns?", "Only toxic waste.\n"),
            SAFETY_UNKNOWN
        );
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn test_duration_without_pilot_is_not_specified() {
        let rules = english();
        let model = StubModel::answering("6 months", 0.95);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        let q = "What is the estimated duration of the project?";
        assert_eq!(r.resolve(q, "A chemical additives plant.\n"), DURATION_UNKNOWN);
        assert_eq!(r.resolve(q, BRIEF), DURATION_FROM_PILOT);
    }

    #[test]
    fn test_pattern_miss_falls_back_to_inference() {
        let rules = english();
        let model = StubModel::answering("unused", 0.9);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        // No "Domain:" line, but geodata is mentioned
        let ctx = "A platform for geodata analytics.\n";
        assert_eq!(r.resolve("Which sector?", ctx), "Climate Tech");
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn test_pattern_miss_falls_back_to_model() {
        let rules = english();
        let model = StubModel::answering("Jorf Lasfar", 0.8);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        // No "Pilot Plant Location:" line → model answers
        assert_eq!(r.resolve("Where is the pilot plant located?", BRIEF), "Jorf Lasfar");
        assert_eq!(model.calls.get(), 1);
    }

    #[test]
    fn test_clean_only_rule_cleans_model_answer() {
        let rules = english();
        let model = StubModel::answering(" UMP6P (Mr BENHIDA & Mr MAKAN) ", 0.7);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("What technology is the project based on?", BRIEF), "UMP6P");
    }

    #[test]
    fn test_low_confidence_is_not_found() {
        let rules = english();
        let model = StubModel::answering("Casablanca", 0.05);
        let cfg   = ResolverConfig::default();
        let r     = AnswerResolver::new(&rules, &model, cfg.clone());

        assert_eq!(r.resolve("Who signed the contract?", BRIEF), cfg.not_found_message);
    }

    #[test]
    fn test_threshold_is_inclusive_lower_bound() {
        let rules = english();
        let model = StubModel::answering("Casablanca", DEFAULT_THRESHOLD);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("Who signed the contract?", BRIEF), "Casablanca");
    }

    #[test]
    fn test_empty_or_sentinel_answer_is_not_found() {
        let rules = english();
        let cfg   = ResolverConfig::default();

        let blank = StubModel::answering("   ", 0.9);
        let r     = AnswerResolver::new(&rules, &blank, cfg.clone());
        assert_eq!(r.resolve("Who signed the contract?", BRIEF), cfg.not_found_message);

        let cls = StubModel::answering("[CLS]", 0.9);
        let r   = AnswerResolver::new(&rules, &cls, cfg.clone());
        assert_eq!(r.resolve("Who signed the contract?", BRIEF), cfg.not_found_message);
    }

    #[test]
    fn test_cleaning_to_empty_is_not_found() {
        let rules = english();
        let model = StubModel::answering("(confidential)", 0.9);
        let cfg   = ResolverConfig::default();
        let r     = AnswerResolver::new(&rules, &model, cfg.clone());

        assert_eq!(r.resolve("Which technology?", BRIEF), cfg.not_found_message);
    }

    #[test]
    fn test_model_failure_is_recovered() {
        let rules = english();
        let model = StubModel::failing();
        let cfg   = ResolverConfig::default();
        let r     = AnswerResolver::new(&rules, &model, cfg.clone());

        assert_eq!(r.resolve("Who signed the contract?", BRIEF), cfg.model_failure_message);
    }

    #[test]
    fn test_infer_only_rule_beats_confident_model() {
        let rules = RuleTable::from_specs(vec![RuleSpec {
            topic:    "budget".into(),
            triggers: vec!["budget".into()],
            extract:  None,
            clean:    vec![Cleaner::Trim],
            infer:    Some(Inference::fixed("Not disclosed")),
        }]).unwrap();
        let model = StubModel::answering("12 MUSD", 1.0);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("What is the budget?", BRIEF), "Not disclosed");
        assert_eq!(model.calls.get(), 0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let rules = english();
        let model = StubModel::answering("Jorf Lasfar", 0.8);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        for q in Language::English.default_questions() {
            assert_eq!(r.resolve(q, BRIEF), r.resolve(q, BRIEF));
        }
    }

    #[test]
    fn test_resolve_all_keeps_question_order() {
        let rules = english();
        let model = StubModel::answering("Jorf Lasfar", 0.8);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        let questions = Language::English.default_questions();
        let analysis  = r.resolve_all(questions, BRIEF);

        let order: Vec<&str> = analysis.iter().map(|(q, _)| q).collect();
        assert_eq!(order, questions.to_vec());
        assert_eq!(analysis.get("What are the safety concerns?"), Some(SAFETY_HIGH_RISK));
        assert_eq!(analysis.get("What is the sector of the project?"), Some("Industrial - Chemical."));
    }

    #[test]
    fn test_french_questions_use_same_rules() {
        let rules = RuleTable::builtin(Language::French).unwrap();
        let model = StubModel::answering("unused", 0.9);
        let r     = AnswerResolver::new(&rules, &model, ResolverConfig::default());

        assert_eq!(r.resolve("Quel est le secteur du projet?", BRIEF), "Industrial - Chemical.");
        assert_eq!(
            r.resolve("Quelles sont les préoccupations en matière de sécurité?", BRIEF),
            SAFETY_HIGH_RISK
        );
    }
}
