// ============================================================
// Layer 3 — Answer Types
// ============================================================
// ModelAnswer is what the Q&A model hands back for one
// question. Analysis is what the resolver hands back for a
// whole question list: an insertion-ordered mapping from
// question to final answer string.

use serde::{Deserialize, Serialize};

/// A raw span prediction from the Q&A model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAnswer {
    pub text: String,

    /// Probability of the predicted span, in [0, 1]
    pub confidence: f32,
}

impl ModelAnswer {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self { text: text.into(), confidence }
    }
}

/// Answers for an ordered list of questions.
/// Order follows the question list the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    entries: Vec<(String, String)>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. A repeated question keeps its first
    /// position and takes the newest answer.
    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer   = answer.into();
        match self.entries.iter_mut().find(|(q, _)| *q == question) {
            Some(entry) => entry.1 = answer,
            None        => self.entries.push((question, answer)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render as a JSON object `{question: answer, ...}`.
    /// serde_json's `preserve_order` feature keeps question order.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(q, a)| (q.clone(), serde_json::Value::String(a.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_preserves_insertion_order() {
        let mut a = Analysis::new();
        a.insert("Q2", "second");
        a.insert("Q1", "first");
        let order: Vec<&str> = a.iter().map(|(q, _)| q).collect();
        assert_eq!(order, vec!["Q2", "Q1"]);
    }

    #[test]
    fn test_repeated_question_keeps_position() {
        let mut a = Analysis::new();
        a.insert("Q1", "old");
        a.insert("Q2", "x");
        a.insert("Q1", "new");
        assert_eq!(a.len(), 2);
        assert_eq!(a.get("Q1"), Some("new"));
        assert_eq!(a.iter().next(), Some(("Q1", "new")));
    }

    #[test]
    fn test_json_keeps_order() {
        let mut a = Analysis::new();
        a.insert("b?", "2");
        a.insert("a?", "1");
        let json = a.to_json().to_string();
        assert_eq!(json, r#"{"b?":"2","a?":"1"}"#);
    }
}
