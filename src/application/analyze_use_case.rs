// ============================================================
// Layer 2 — Analyze Use Case
// ============================================================
// One request, start to finish:
//
//   Step 1: Extract the context    (BriefInput::ingest, Layer 4)
//   Step 2: Build the rule table   (built-in or JSON file)
//   Step 3: Load the Q&A model     (checkpoint, or none)
//   Step 4: Resolve every question (Layer 3b - resolver)
//
// Ingestion comes first and needs no model: a bad upload is
// reported with its IngestError code before any checkpoint is
// touched. Steps 2–3 happen once in `new`; a use case can then
// analyse any number of documents.

use anyhow::{Context, Result};

use crate::data::loader::{PastedText, Upload};
use crate::domain::answer::Analysis;
use crate::domain::document::Document;
use crate::domain::language::Language;
use crate::domain::traits::{QaModel, TextSource, UnavailableModel};
use crate::error::IngestError;
use crate::ml::inferencer::Inferencer;
use crate::resolver::answer_resolver::{AnswerResolver, ResolverConfig};
use crate::resolver::rule_table::RuleTable;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub language:       Language,
    /// Questions to ask; empty means the language's default set
    pub questions:      Vec<String>,
    /// JSON rule file replacing the built-in table
    pub rules_path:     Option<String>,
    pub checkpoint_dir: String,
    /// false → rule-only run, model questions get the failure message
    pub use_model:      bool,
    pub resolver:       ResolverConfig,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            language:       Language::English,
            questions:      Vec::new(),
            rules_path:     None,
            checkpoint_dir: "checkpoints".to_string(),
            use_model:      true,
            resolver:       ResolverConfig::default(),
        }
    }
}

impl AnalyzeConfig {
    pub fn questions(&self) -> Vec<String> {
        if self.questions.is_empty() {
            self.language
                .default_questions()
                .iter()
                .map(|q| q.to_string())
                .collect()
        } else {
            self.questions.clone()
        }
    }
}

/// Where the project brief comes from.
#[derive(Debug, Clone)]
pub enum BriefInput {
    File(String),
    Text(String),
}

impl BriefInput {
    /// Read and normalise the brief. No question is resolved
    /// against an input that fails here.
    pub fn ingest(&self) -> Result<Document, IngestError> {
        self.source()?.extract_text()
    }

    fn source(&self) -> Result<Box<dyn TextSource>, IngestError> {
        Ok(match self {
            BriefInput::File(path) => Box::new(Upload::from_path(path)?),
            BriefInput::Text(text) => Box::new(PastedText(text.clone())),
        })
    }
}

/// Build the rule table a config asks for.
pub fn load_rules(rules_path: Option<&str>, language: Language) -> Result<RuleTable> {
    match rules_path {
        Some(path) => RuleTable::load(path),
        None       => RuleTable::builtin(language).context("Built-in rule table is invalid"),
    }
}

// ─── AnalyzeUseCase ───────────────────────────────────────────────────────────
pub struct AnalyzeUseCase {
    config: AnalyzeConfig,
    rules:  RuleTable,
    model:  Box<dyn QaModel>,
}

impl AnalyzeUseCase {
    /// Build the rule table and load the model (eagerly).
    pub fn new(config: AnalyzeConfig) -> Result<Self> {
        let model: Box<dyn QaModel> = if config.use_model {
            Box::new(
                Inferencer::load(&config.checkpoint_dir).with_context(|| {
                    format!(
                        "Cannot load the Q&A model from '{}' (use --no-model for rules only)",
                        config.checkpoint_dir
                    )
                })?,
            )
        } else {
            tracing::info!("Running without a Q&A model");
            Box::new(UnavailableModel)
        };
        Self::with_model(config, model)
    }

    /// Build with an already-constructed model.
    pub fn with_model(config: AnalyzeConfig, model: Box<dyn QaModel>) -> Result<Self> {
        let threshold = config.resolver.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("Confidence threshold must be within [0, 1], got {threshold}");
        }

        let rules = load_rules(config.rules_path.as_deref(), config.language)?;
        tracing::debug!("Rule table has {} rules", rules.len());

        Ok(Self { config, rules, model })
    }

    /// Answer the configured questions about one ingested brief.
    pub fn execute(&self, document: &Document) -> Analysis {
        let questions = self.config.questions();

        tracing::info!(
            "Resolving {} questions against '{}'",
            questions.len(),
            document.source
        );

        let resolver = AnswerResolver::new(&self.rules, self.model.as_ref(), self.config.resolver.clone());
        let analysis = resolver.resolve_all(&questions, &document.text);
        tracing::debug!("{} answers for '{}'", analysis.len(), document.source);
        analysis
    }
}
