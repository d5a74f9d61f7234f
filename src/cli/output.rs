//! Output formatting for CLI commands.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::token::{Token, TokenKind};
use crate::cli::args::{MorphmarkArgs, OutputFormat};
use crate::error::Result;
use crate::search::matches::Match;
use crate::stats::AnalysisReport;

/// Result structure for tokenization.
#[derive(Debug, Serialize)]
pub struct TokenizeResult {
    pub tokenizer: String,
    pub morphology: String,
    pub tokens: Vec<Token>,
}

/// Result structure for text search.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub strategy: String,
    pub phrases: usize,
    pub patterns: usize,
    pub matches: Vec<Match>,
    pub report: AnalysisReport,
}

/// Result structure for one highlighted document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report: AnalysisReport,
}

/// Outcome of one document in a batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result structure for batch highlighting.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: usize,
    pub failed: usize,
    pub total_matches: usize,
    pub duration_ms: u64,
    pub documents: Vec<BatchEntry>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &MorphmarkArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MorphmarkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanOutput for TokenizeResult {
    fn print_human(&self) {
        println!("Tokens ({} / {}):", self.tokenizer, self.morphology);
        println!("═══════════════");
        for (i, token) in self.tokens.iter().enumerate() {
            let kind = match token.kind {
                TokenKind::Word => "word",
                TokenKind::Punctuation => "punct",
                TokenKind::Space => "space",
            };
            let forms = match (&token.lemma, &token.stem) {
                (Some(lemma), Some(stem)) => format!("  lemma={lemma} stem={stem}"),
                _ => String::new(),
            };
            println!(
                "{i:>4}  {kind:<6} {:>5}..{:<5} {:?}{forms}",
                token.start, token.end, token.text
            );
        }
    }
}

impl HumanOutput for SearchOutput {
    fn print_human(&self) {
        println!(
            "Searched {} phrases and {} patterns ({}):",
            self.phrases, self.patterns, self.strategy
        );
        println!("═══════════════");
        if self.matches.is_empty() {
            println!("No matches found.");
        }
        for m in &self.matches {
            let by = m
                .matched_by
                .map(|by| format!(" by {}", format!("{by:?}").to_lowercase()))
                .unwrap_or_default();
            println!(
                "  [{}..{}] {:<6} {:?} <- {:?}{by}",
                m.start,
                m.end,
                m.kind.to_string(),
                m.found_text,
                m.search_text
            );
        }
        println!();
        print_report(&self.report);
    }
}

impl HumanOutput for DocumentResult {
    fn print_human(&self) {
        println!("{} -> {}", self.input.display(), self.output.display());
        print_report(&self.report);
    }
}

impl HumanOutput for BatchResult {
    fn print_human(&self) {
        println!("Batch Results:");
        println!("═══════════════");
        for entry in &self.documents {
            match (&entry.report, &entry.error) {
                (Some(report), _) => println!(
                    "  ok    {}: {} matches{}",
                    entry.input.display(),
                    report.total_matches,
                    if report.is_complete() {
                        String::new()
                    } else {
                        format!(", {} units failed", report.failures.len())
                    }
                ),
                (None, error) => println!(
                    "  FAIL  {}: {}",
                    entry.input.display(),
                    error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
        println!();
        println!(
            "{} processed, {} failed, {} matches in {}",
            self.processed,
            self.failed,
            self.total_matches,
            format_duration(self.duration_ms)
        );
    }
}

/// Print statistics and failures of one document.
fn print_report(report: &AnalysisReport) {
    println!("Statistics:");
    for item in &report.stats {
        println!(
            "  {} ({}): {}",
            item.search.text, item.search.kind, item.total
        );
        for form in &item.forms {
            if form.pages.is_empty() {
                println!("    {}: {}", form.text, form.count);
            } else {
                let pages: Vec<String> = form.pages.iter().map(|p| (p + 1).to_string()).collect();
                println!("    {}: {} (pages {})", form.text, form.count, pages.join(", "));
            }
        }
    }
    println!("Total matches: {}", report.total_matches);

    if !report.failures.is_empty() {
        println!("Failures:");
        for failure in &report.failures {
            println!("  {}: {}", failure.unit, failure.message);
        }
    }
}

/// Format a duration in milliseconds for display.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms} ms")
    } else {
        format!("{:.1} s", ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250 ms");
        assert_eq!(format_duration(1500), "1.5 s");
    }

    #[test]
    fn test_batch_entry_serialization() {
        let entry = BatchEntry {
            input: PathBuf::from("a.docx"),
            output: PathBuf::from("out/a.docx"),
            report: None,
            error: Some("Document error: w:body is missing".to_string()),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("report").is_none());
        assert_eq!(json["error"], "Document error: w:body is missing");
    }
}
