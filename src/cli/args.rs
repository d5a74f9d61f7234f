//! Command line argument parsing for Morphmark CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::search::phrase::PredefinedList;
use crate::search::strategy::StrategyKind;

/// Morphmark - morphology-aware term search and document highlighting
#[derive(Parser, Debug, Clone)]
#[command(name = "morphmark")]
#[command(about = "Find search terms in any inflected form and highlight them in documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MorphmarkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Highlight configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Lemma table (tab-separated: word, lemma, optional part of speech)
    #[arg(long, value_name = "LEMMA_FILE")]
    pub lemmas: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MorphmarkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show tokens with their lemmas and stems
    Tokenize(TokenizeArgs),

    /// Search a text and print matches with statistics
    Search(SearchArgs),

    /// Highlight terms in a .docx document
    #[command(name = "highlight-docx")]
    HighlightDocx(HighlightDocxArgs),

    /// Highlight terms in a PDF file or a raw-dict JSON dump
    #[command(name = "highlight-pdf")]
    HighlightPdf(HighlightPdfArgs),

    /// Highlight every .docx document in a directory in parallel
    Batch(BatchArgs),
}

/// Where search terms come from.
#[derive(Args, Debug, Clone, Default)]
pub struct TermArgs {
    /// Search term (repeatable)
    #[arg(short = 't', long = "term", value_name = "TERM")]
    pub terms: Vec<String>,

    /// Terms file: one term per line, or per paragraph for .docx (repeatable)
    #[arg(long = "terms", value_name = "TERMS_FILE")]
    pub term_files: Vec<PathBuf>,

    /// Terms file of a predefined list, as SLUG=FILE (repeatable)
    #[arg(long = "list", value_name = "SLUG=FILE", value_parser = parse_list_file)]
    pub lists: Vec<(PredefinedList, PathBuf)>,

    /// Regular expression, as NAME=PATTERN (repeatable)
    #[arg(long = "pattern", value_name = "NAME=PATTERN", value_parser = parse_pattern)]
    pub patterns: Vec<(String, String)>,

    /// Matching strategy (overrides the configuration file)
    #[arg(long, value_name = "STRATEGY", value_parser = parse_strategy)]
    pub strategy: Option<StrategyKind>,
}

impl TermArgs {
    /// True when no term source was given at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.term_files.is_empty()
            && self.lists.is_empty()
            && self.patterns.is_empty()
    }
}

/// Arguments for tokenizing
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    /// Text to tokenize
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for searching a text
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Text to search
    #[arg(long, value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub terms: TermArgs,
}

/// Arguments for highlighting a .docx document
#[derive(Parser, Debug, Clone)]
pub struct HighlightDocxArgs {
    /// Input document
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output document
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub terms: TermArgs,
}

/// Arguments for highlighting a PDF
#[derive(Parser, Debug, Clone)]
pub struct HighlightPdfArgs {
    /// Input .pdf file, or raw-dict JSON for any other extension
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file, in the same format as the input
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub terms: TermArgs,
}

/// Arguments for batch highlighting
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Directory with .docx documents
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "OUT_DIR")]
    pub out: PathBuf,

    /// Worker threads (default: one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub terms: TermArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn split_pair(value: &str) -> Result<(&str, &str), String> {
    value
        .split_once('=')
        .filter(|(key, rest)| !key.is_empty() && !rest.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{value}'"))
}

fn parse_list_file(value: &str) -> Result<(PredefinedList, PathBuf), String> {
    let (slug, path) = split_pair(value)?;
    let list = PredefinedList::from_slug(slug).ok_or_else(|| {
        let known: Vec<_> = PredefinedList::ALL.iter().map(|l| l.slug()).collect();
        format!("unknown list '{slug}' (known: {})", known.join(", "))
    })?;
    Ok((list, PathBuf::from(path)))
}

fn parse_pattern(value: &str) -> Result<(String, String), String> {
    let (name, pattern) = split_pair(value)?;
    Ok((name.to_string(), pattern.to_string()))
}

fn parse_strategy(value: &str) -> Result<StrategyKind, String> {
    value.parse().map_err(|e: crate::error::MorphmarkError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command() {
        let args = MorphmarkArgs::try_parse_from([
            "morphmark",
            "search",
            "--text",
            "The quick Fox jumps.",
            "--term",
            "quick fox",
            "-t",
            "лиса",
            "--terms",
            "terms.txt",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.text, "The quick Fox jumps.");
            assert_eq!(search_args.terms.terms, vec!["quick fox", "лиса"]);
            assert_eq!(search_args.terms.term_files, vec![PathBuf::from("terms.txt")]);
            assert_eq!(search_args.terms.strategy, None);
        } else {
            panic!("Expected search command");
        }
    }

    #[test]
    fn test_highlight_docx_command() {
        let args = MorphmarkArgs::try_parse_from([
            "morphmark",
            "--config",
            "colors.json",
            "--lemmas",
            "lemmas.tsv",
            "highlight-docx",
            "in.docx",
            "out.docx",
            "--list",
            "profanity=words.txt",
            "--pattern",
            "phone=\\d{3}-\\d{4}",
            "--strategy",
            "strict",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("colors.json")));
        assert_eq!(args.lemmas, Some(PathBuf::from("lemmas.tsv")));
        if let Command::HighlightDocx(docx_args) = args.command {
            assert_eq!(docx_args.input, PathBuf::from("in.docx"));
            assert_eq!(
                docx_args.terms.lists,
                vec![(PredefinedList::Profanity, PathBuf::from("words.txt"))]
            );
            assert_eq!(
                docx_args.terms.patterns,
                vec![("phone".to_string(), "\\d{3}-\\d{4}".to_string())]
            );
            assert_eq!(docx_args.terms.strategy, Some(StrategyKind::Strict));
        } else {
            panic!("Expected highlight-docx command");
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(
            MorphmarkArgs::try_parse_from(["morphmark", "search", "--text", "x", "--list", "nope=a.txt"])
                .is_err()
        );
        assert!(
            MorphmarkArgs::try_parse_from(["morphmark", "search", "--text", "x", "--pattern", "=a"])
                .is_err()
        );
        assert!(
            MorphmarkArgs::try_parse_from(["morphmark", "search", "--text", "x", "--strategy", "fuzzy"])
                .is_err()
        );
    }

    #[test]
    fn test_batch_command() {
        let args = MorphmarkArgs::try_parse_from([
            "morphmark", "batch", "docs", "--out", "marked", "-j", "4", "--terms", "t.txt",
        ])
        .unwrap();

        if let Command::Batch(batch_args) = args.command {
            assert_eq!(batch_args.directory, PathBuf::from("docs"));
            assert_eq!(batch_args.out, PathBuf::from("marked"));
            assert_eq!(batch_args.threads, Some(4));
            assert!(!batch_args.terms.is_empty());
        } else {
            panic!("Expected batch command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = MorphmarkArgs::try_parse_from(["morphmark", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = MorphmarkArgs::try_parse_from(["morphmark", "-vv", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = MorphmarkArgs::try_parse_from(["morphmark", "--quiet", "tokenize", "x"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            MorphmarkArgs::try_parse_from(["morphmark", "--format", "json", "tokenize", "x"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
