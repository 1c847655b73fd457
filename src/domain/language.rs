// ============================================================
// Layer 3 — Question Language
// ============================================================
// The same topics are asked in English or French. Language is
// a configuration value: it picks the built-in question list
// and the trigger phrases of the built-in rule table, nothing
// else in the pipeline changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,

    #[serde(rename = "fr")]
    French,
}

impl Language {
    /// The standard project-brief questions, one per topic,
    /// in the order answers are reported.
    pub fn default_questions(self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "What is the sector of the project?",
                "Where is the pilot plant located?",
                "What technology is the project based on?",
                "What is the estimated duration of the project?",
                "Who is the Customer?",
                "What are the safety concerns?",
                "What is the production capacity?",
            ],
            Language::French => &[
                "Quel est le secteur du projet?",
                "Où est située l'installation pilote?",
                "Sur quelle technologie le projet est-il basé?",
                "Quelle est la durée estimée du projet?",
                "Qui est le client?",
                "Quelles sont les préoccupations en matière de sécurité?",
                "Quelle est la capacité de production?",
            ],
        }
    }
}
