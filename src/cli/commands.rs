// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   analyze — answer the standard questions about a brief
//   ask     — answer one question about a brief
//   rules   — print the effective rule table
//
// clap types stop here: every argument struct is converted
// into an application-layer config with a From impl.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::analyze_use_case::{AnalyzeConfig, BriefInput};
use crate::domain::language::Language;
use crate::resolver::answer_resolver::{ResolverConfig, DEFAULT_THRESHOLD};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer the standard project-brief questions
    Analyze(AnalyzeArgs),

    /// Answer a single question
    Ask(AskArgs),

    /// List the rule table in evaluation order
    Rules(RulesArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LanguageArg {
    En,
    Fr,
}

impl From<LanguageArg> for Language {
    fn from(l: LanguageArg) -> Self {
        match l {
            LanguageArg::En => Language::English,
            LanguageArg::Fr => Language::French,
        }
    }
}

/// The brief to analyse: exactly one of --file / --text.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Project brief file (.txt, .pdf, .docx)
    #[arg(long)]
    pub file: Option<String>,

    /// Project description given inline
    #[arg(long)]
    pub text: Option<String>,
}

impl InputArgs {
    pub fn to_input(&self) -> BriefInput {
        match (&self.file, &self.text) {
            (Some(path), _) => BriefInput::File(path.clone()),
            (None, Some(t)) => BriefInput::Text(t.clone()),
            // clap's required group guarantees one of them
            (None, None)    => BriefInput::Text(String::new()),
        }
    }
}

/// Options shared by `analyze` and `ask`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Question language: selects default questions and trigger phrases
    #[arg(long, value_enum, default_value = "en")]
    pub language: LanguageArg,

    /// JSON rule file replacing the built-in rules
    #[arg(long)]
    pub rules: Option<String>,

    /// Minimum model confidence to keep an answer
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Directory holding the Q&A model checkpoint and tokenizer
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Skip the Q&A model; only rules answer
    #[arg(long)]
    pub no_model: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ResolveArgs {
    fn config(&self, questions: Vec<String>) -> AnalyzeConfig {
        AnalyzeConfig {
            language:       self.language.into(),
            questions,
            rules_path:     self.rules.clone(),
            checkpoint_dir: self.checkpoint_dir.clone(),
            use_model:      !self.no_model,
            resolver:       ResolverConfig {
                threshold: self.threshold,
                ..ResolverConfig::default()
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Replace the default questions (repeatable)
    #[arg(long = "question")]
    pub questions: Vec<String>,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

impl From<&AnalyzeArgs> for AnalyzeConfig {
    fn from(a: &AnalyzeArgs) -> Self {
        a.resolve.config(a.questions.clone())
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    #[arg(long)]
    pub question: String,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

impl From<&AskArgs> for AnalyzeConfig {
    fn from(a: &AskArgs) -> Self {
        a.resolve.config(vec![a.question.clone()])
    }
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    #[arg(long, value_enum, default_value = "en")]
    pub language: LanguageArg,

    /// JSON rule file to list instead of the built-in rules
    #[arg(long)]
    pub rules: Option<String>,
}
