// ============================================================
// Answer Resolution — Built-in Project-Brief Rules
// ============================================================
// The default rule table for project briefs. One table serves
// both question languages; only the trigger phrases change.
//
// Table order matters (first match wins):
//   sector → customer → technology → duration → safety
//          → location → capacity
//
// Why these rules exist at all: an extractive model can only
// point at a span. It cannot reason "5T/week pilot scaled to
// 75T/day ⇒ 2-3 years", and it does not know that "flammable"
// next to "toxic" is a safety flag. Those answers are encoded
// here; everything else goes to the model.

use crate::domain::language::Language;
use crate::error::RuleError;
use crate::resolver::rule_table::{RuleSpec, RuleTable};
use crate::resolver::transforms::{Cleaner, Inference, KeywordBranch};

pub const DURATION_FROM_PILOT: &str =
    "2-3 years (estimated from capacity scaling 5T/week → 75T/day)";
pub const DURATION_UNKNOWN: &str = "Duration not specified";
pub const SAFETY_HIGH_RISK: &str =
    "High risk: Requires special handling for flammable and toxic materials";
pub const SAFETY_UNKNOWN: &str = "Safety concerns not specified";

impl RuleTable {
    /// The built-in table with trigger phrases for `language`.
    pub fn builtin(language: Language) -> Result<Self, RuleError> {
        Self::from_specs(builtin_specs(language))
    }
}

/// Trigger phrases per topic, in table order.
fn triggers(language: Language, topic: &str) -> Vec<String> {
    let phrases: &[&str] = match (language, topic) {
        (Language::English, "sector")     => &["sector", "domain", "output"],
        (Language::English, "customer")   => &["customer", "client", "sponsor"],
        (Language::English, "technology") => &["technology"],
        (Language::English, "duration")   => &["duration", "timeline", "how long"],
        (Language::English, "safety")     => &["safety", "concern"],
        (Language::English, "location")   => &["location", "pilot plant"],
        (Language::English, "capacity")   => &["production capacity", "capacity"],

        (Language::French, "sector")      => &["secteur", "domaine"],
        (Language::French, "customer")    => &["client", "commanditaire", "sponsor"],
        (Language::French, "technology")  => &["technologie"],
        (Language::French, "duration")    => &["durée", "calendrier", "combien de temps"],
        (Language::French, "safety")      => &["sécurité", "préoccupation"],
        (Language::French, "location")    => &["située", "installation pilote", "emplacement"],
        (Language::French, "capacity")    => &["capacité de production", "capacité"],

        _ => &[],
    };
    phrases.iter().map(|p| p.to_string()).collect()
}

fn keyword(all_of: &[&str], case_sensitive: bool, answer: &str) -> KeywordBranch {
    KeywordBranch {
        all_of: all_of.iter().map(|k| k.to_string()).collect(),
        case_sensitive,
        answer: answer.to_string(),
    }
}

pub fn builtin_specs(language: Language) -> Vec<RuleSpec> {
    vec![
        RuleSpec {
            topic:    "sector".into(),
            triggers: triggers(language, "sector"),
            extract:  Some(r"Domain: (.+?)\n".into()),
            clean:    vec![Cleaner::AfterLastColon],
            infer:    Some(Inference {
                branches: vec![
                    keyword(&["geodata"], false, "Climate Tech"),
                    keyword(&["ZB"], true, "Data Infrastructure"),
                ],
                otherwise: "Information not found".into(),
            }),
        },
        RuleSpec {
            topic:    "customer".into(),
            triggers: triggers(language, "customer"),
            extract:  Some(r"Sponsor:\s*(.*?)\s*\(".into()),
            clean:    vec![
                Cleaner::CutAt { marker: "[".into() },
                Cleaner::ParenthesiseFrom { marker: "subsidiary of".into() },
            ],
            infer:    None,
        },
        RuleSpec {
            topic:    "technology".into(),
            triggers: triggers(language, "technology"),
            extract:  None,
            clean:    vec![Cleaner::StripParenthesised],
            infer:    None,
        },
        RuleSpec {
            topic:    "duration".into(),
            triggers: triggers(language, "duration"),
            extract:  None,
            clean:    Vec::new(),
            infer:    Some(Inference {
                branches:  vec![keyword(&["pilot"], false, DURATION_FROM_PILOT)],
                otherwise: DURATION_UNKNOWN.into(),
            }),
        },
        RuleSpec {
            topic:    "safety".into(),
            triggers: triggers(language, "safety"),
            extract:  None,
            clean:    Vec::new(),
            infer:    Some(Inference {
                branches:  vec![keyword(&["flammable", "toxic"], false, SAFETY_HIGH_RISK)],
                otherwise: SAFETY_UNKNOWN.into(),
            }),
        },
        RuleSpec {
            topic:    "location".into(),
            triggers: triggers(language, "location"),
            extract:  Some(r"Pilot Plant Location:\s*(.*?)\s*\n".into()),
            clean:    vec![Cleaner::Trim],
            infer:    None,
        },
        RuleSpec {
            topic:    "capacity".into(),
            triggers: triggers(language, "capacity"),
            extract:  Some(r"Production Capacity:\s*(.*?)\s*\n".into()),
            clean:    vec![Cleaner::Trim],
            infer:    None,
        },
    ]
}
