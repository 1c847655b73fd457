// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2.
//
//   analyze — standard questions about a brief
//   ask     — one question about a brief
//   rules   — show which topic each trigger phrase selects
//
// The brief is ingested before the model is loaded, so a bad
// upload fails fast. Ingestion failures are reported with their
// error code; in --json mode as {"error": {"code": ..., "message": ...}}.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InputArgs, ResolveArgs, RulesArgs};

use crate::application::analyze_use_case::{load_rules, AnalyzeConfig, AnalyzeUseCase};
use crate::domain::answer::Analysis;
use crate::error::IngestError;
use crate::resolver::rule_table::RuleTable;

#[derive(Parser, Debug)]
#[command(
    name = "project-brief-qa",
    version,
    about = "Answer standard questions about a project brief (txt, pdf, docx)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Analyze(args) => run_resolve(args.into(), &args.input, &args.resolve),
            Commands::Ask(args)     => run_resolve(args.into(), &args.input, &args.resolve),
            Commands::Rules(args)   => run_rules(args),
        }
    }
}

fn run_resolve(config: AnalyzeConfig, input: &InputArgs, opts: &ResolveArgs) -> Result<()> {
    let document = match input.to_input().ingest() {
        Ok(document) => document,
        Err(err) => {
            if opts.json {
                println!("{}", error_json(&err));
            }
            return Err(anyhow::anyhow!("[{}] {}", err.code(), err));
        }
    };

    let use_case = AnalyzeUseCase::new(config)?;
    print_analysis(&use_case.execute(&document), opts.json)
}

fn print_analysis(analysis: &Analysis, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis.to_json())?);
        return Ok(());
    }
    for (question, answer) in analysis.iter() {
        println!("{question} → {answer}");
    }
    Ok(())
}

fn error_json(err: &IngestError) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code":    err.code(),
            "message": err.to_string(),
        }
    })
}

fn run_rules(args: &RulesArgs) -> Result<()> {
    let table = load_rules(args.rules.as_deref(), args.language.into())?;
    for line in rule_lines(&table) {
        println!("{line}");
    }
    Ok(())
}

fn rule_lines(table: &RuleTable) -> Vec<String> {
    table
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let pattern = rule
                .strategy
                .pattern()
                .map(|p| format!("  pattern: {}", p.as_str().escape_debug()))
                .unwrap_or_default();
            format!(
                "{:>2}. {:<12} [{}] triggers: {}{}",
                i + 1,
                rule.topic,
                rule.strategy.label(),
                rule.triggers.join(", "),
                pattern
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_json_shape() {
        let v = error_json(&IngestError::UnsupportedFormat("xls".into()));
        assert_eq!(v["error"]["code"], "unsupported_format");
        assert_eq!(v["error"]["message"], "Unsupported file format: 'xls'");
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "project-brief-qa", "analyze", "--text", "Domain: Energy", "--language", "fr", "--no-model",
        ]).unwrap();
        match cli.command {
            Commands::Analyze(a) => {
                let config = AnalyzeConfig::from(&a);
                assert!(!config.use_model);
                assert!(config.questions.is_empty());
                assert_eq!(config.language, crate::domain::language::Language::French);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from([
            "project-brief-qa", "ask", "--question", "Who is the Customer?",
            "--text", "x", "--threshold", "0.3",
        ]).unwrap();
        match cli.command {
            Commands::Ask(a) => {
                let config = AnalyzeConfig::from(&a);
                assert_eq!(config.questions(), vec!["Who is the Customer?".to_string()]);
                assert!(config.use_model);
                assert!((config.resolver.threshold - 0.3).abs() < 1e-6);
                assert_eq!(config.checkpoint_dir, "checkpoints");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_a_question() {
        assert!(Cli::try_parse_from(["project-brief-qa", "ask", "--text", "x"]).is_err());
    }

    #[test]
    fn test_unsupported_file_reported_before_model_load() {
        // No checkpoint exists there: loading the model would fail first
        let cli = Cli::try_parse_from([
            "project-brief-qa", "analyze", "--file", "brief.pptx",
            "--checkpoint-dir", "/nonexistent/checkpoints",
        ]).unwrap();
        let err = cli.run().unwrap_err().to_string();
        assert!(err.starts_with("[unsupported_format]"), "{err}");
    }

    #[test]
    fn test_rule_lines_follow_table_order() {
        let table = load_rules(None, crate::domain::language::Language::French).unwrap();
        let lines = rule_lines(&table);
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with(" 1. sector"));
        assert!(lines[0].contains("secteur"));
        assert!(lines[6].starts_with(" 7. capacity"));
    }

    #[test]
    fn test_cli_requires_exactly_one_input() {
        assert!(Cli::try_parse_from(["project-brief-qa", "analyze"]).is_err());
        assert!(Cli::try_parse_from([
            "project-brief-qa", "analyze", "--file", "a.pdf", "--text", "x",
        ]).is_err());
    }
}
