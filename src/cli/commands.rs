//! Command implementations for Morphmark CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::analyzer::MorphAnalyzer;
use crate::analysis::morphology::{LemmaTable, MorphologyService, SnowballMorphology};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::HighlightConfig;
use crate::error::Result;
use crate::highlight::annotation::ListAnnotations;
use crate::highlight::docx::{DocxAnalyser, DocxPackage};
use crate::highlight::pdf::{
    NoOcr, OxideDocument, PdfAnalyser, PdfDocument, PuaMap, RawDictDocument,
};
use crate::search::phrase::{PhraseSet, Provenance};
use crate::search::regex::RegexPattern;
use crate::search::searcher::Searcher;
use crate::search::terms::read_terms;
use crate::stats::{AnalysisReport, Stats};

/// Execute a CLI command.
pub fn execute_command(args: MorphmarkArgs) -> Result<()> {
    match &args.command {
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args, &args),
        Command::Search(search_args) => search_text(search_args, &args),
        Command::HighlightDocx(docx_args) => highlight_docx(docx_args, &args),
        Command::HighlightPdf(pdf_args) => highlight_pdf(pdf_args, &args),
        Command::Batch(batch_args) => batch(batch_args, &args),
    }
}

/// Load the configuration and build the morphology service.
fn load_environment(
    cli_args: &MorphmarkArgs,
    terms: Option<&TermArgs>,
) -> Result<(HighlightConfig, MorphologyService)> {
    let mut config = match &cli_args.config {
        Some(path) => HighlightConfig::from_json_file(path)?,
        None => HighlightConfig::default(),
    };
    if let Some(strategy) = terms.and_then(|t| t.strategy) {
        config = config.strategy(strategy);
    }
    config.validate()?;

    let provider = match &cli_args.lemmas {
        Some(path) => {
            let table = LemmaTable::from_file(path)?;
            info!("Loaded {} lemma entries from {}", table.len(), path.display());
            SnowballMorphology::with_lemmas(table)
        }
        None => SnowballMorphology::new(),
    };
    let service =
        MorphologyService::with_capacity(Arc::new(provider), config.morphology_cache_capacity);

    Ok((config, service))
}

/// Collect phrases and patterns from every term source.
///
/// Predefined lists are read first so their provenance wins when the same
/// term also appears in a plain terms file.
fn load_terms(
    terms: &TermArgs,
    analyzer: &MorphAnalyzer,
) -> Result<(PhraseSet, Vec<Arc<RegexPattern>>)> {
    let mut phrases = PhraseSet::new();
    for (list, path) in &terms.lists {
        phrases.extend_terms(analyzer, read_terms(path)?, Provenance::Predefined(*list));
    }
    for path in &terms.term_files {
        phrases.extend_terms(analyzer, read_terms(path)?, Provenance::File(path.clone()));
    }
    phrases.extend_terms(analyzer, &terms.terms, Provenance::FreeText);

    let patterns = terms
        .patterns
        .iter()
        .map(|(name, pattern)| RegexPattern::new(name.as_str(), pattern).map(Arc::new))
        .collect::<Result<Vec<_>>>()?;

    if phrases.is_empty() && patterns.is_empty() {
        warn!("No usable search terms given");
    }
    debug!(
        "Loaded {} phrases and {} patterns",
        phrases.len(),
        patterns.len()
    );
    Ok((phrases, patterns))
}

/// Log progress of one document.
fn log_progress(name: &str) -> impl Fn(f64) + '_ {
    move |fraction| debug!("{name}: {:.0}%", fraction * 100.0)
}

/// Tokenize a text.
fn tokenize(args: &TokenizeArgs, cli_args: &MorphmarkArgs) -> Result<()> {
    let (_, service) = load_environment(cli_args, None)?;
    let analyzer = MorphAnalyzer::new(service);

    output_result(
        "Tokenized text",
        &TokenizeResult {
            tokenizer: analyzer.tokenizer_name().to_string(),
            morphology: analyzer.morphology().provider_name().to_string(),
            tokens: analyzer.analyze(&args.text),
        },
        cli_args,
    )
}

/// Search a text.
fn search_text(args: &SearchArgs, cli_args: &MorphmarkArgs) -> Result<()> {
    let (config, service) = load_environment(cli_args, Some(&args.terms))?;
    let searcher = Searcher::with_strategy(MorphAnalyzer::new(service), config.strategy.build());
    let (phrases, patterns) = load_terms(&args.terms, searcher.analyzer())?;

    let result = searcher.search_text(&args.text, &phrases, &patterns);
    let mut stats = Stats::new();
    for found in &result.matches {
        stats.record(found);
    }

    output_result(
        "Search completed",
        &SearchOutput {
            strategy: searcher.strategy_name().to_string(),
            phrases: phrases.len(),
            patterns: patterns.len(),
            matches: result.matches,
            report: AnalysisReport::new(stats, Vec::new()),
        },
        cli_args,
    )
}

/// Highlight a .docx document.
fn highlight_docx(args: &HighlightDocxArgs, cli_args: &MorphmarkArgs) -> Result<()> {
    let (config, service) = load_environment(cli_args, Some(&args.terms))?;
    let analyser = DocxAnalyser::new(service.clone(), config);
    let (phrases, patterns) = load_terms(&args.terms, &MorphAnalyzer::new(service))?;

    let report = highlight_one_docx(&analyser, &args.input, &args.output, &phrases, &patterns)?;

    output_result(
        "Document highlighted",
        &DocumentResult {
            input: args.input.clone(),
            output: args.output.clone(),
            report,
        },
        cli_args,
    )
}

fn highlight_one_docx(
    analyser: &DocxAnalyser,
    input: &Path,
    output: &Path,
    phrases: &PhraseSet,
    patterns: &[Arc<RegexPattern>],
) -> Result<AnalysisReport> {
    let mut package = DocxPackage::open(input)?;
    let name = input.display().to_string();
    let report = analyser.analyse(&mut package, phrases, patterns, &log_progress(&name))?;
    package.save(output)?;
    Ok(report)
}

/// Highlight a PDF file, or a raw-dict JSON dump of one.
fn highlight_pdf(args: &HighlightPdfArgs, cli_args: &MorphmarkArgs) -> Result<()> {
    let (config, service) = load_environment(cli_args, Some(&args.terms))?;
    let (phrases, patterns) = load_terms(&args.terms, &MorphAnalyzer::new(service.clone()))?;
    let analyser = PdfAnalyser::new(
        service,
        PuaMap::new(),
        Arc::new(NoOcr),
        Arc::new(ListAnnotations),
        config,
    );

    let report = if has_extension(&args.input, "pdf") {
        let mut document = OxideDocument::open(&args.input)?;
        highlight_one_pdf(&analyser, &mut document, args, &phrases, &patterns)?
    } else {
        let mut document = RawDictDocument::open(&args.input)?;
        highlight_one_pdf(&analyser, &mut document, args, &phrases, &patterns)?
    };

    output_result(
        "Document highlighted",
        &DocumentResult {
            input: args.input.clone(),
            output: args.output.clone(),
            report,
        },
        cli_args,
    )
}

fn highlight_one_pdf<D: PdfDocument>(
    analyser: &PdfAnalyser,
    document: &mut D,
    args: &HighlightPdfArgs,
    phrases: &PhraseSet,
    patterns: &[Arc<RegexPattern>],
) -> Result<AnalysisReport> {
    let name = args.input.display().to_string();
    let report = analyser.analyse(document, phrases, patterns, &log_progress(&name))?;
    document.save(&args.output)?;
    info!(
        "Saved {} highlighted matches to {}",
        report.total_matches,
        args.output.display()
    );
    Ok(report)
}

/// Highlight every .docx document of a directory in parallel.
fn batch(args: &BatchArgs, cli_args: &MorphmarkArgs) -> Result<()> {
    let (config, service) = load_environment(cli_args, Some(&args.terms))?;
    let analyser = DocxAnalyser::new(service.clone(), config);
    let (phrases, patterns) = load_terms(&args.terms, &MorphAnalyzer::new(service))?;

    let inputs = docx_files(&args.directory)
        .with_context(|| format!("Cannot list {}", args.directory.display()))?;
    fs::create_dir_all(&args.out)
        .with_context(|| format!("Cannot create {}", args.out.display()))?;
    if cli_args.verbosity() > 1 {
        println!(
            "Processing {} documents from {}",
            inputs.len(),
            args.directory.display()
        );
    }

    let start_time = Instant::now();
    let run = || {
        inputs
            .par_iter()
            .map(|input| {
                let output = args.out.join(input.file_name().unwrap_or_default());
                match highlight_one_docx(&analyser, input, &output, &phrases, &patterns) {
                    Ok(report) => BatchEntry {
                        input: input.clone(),
                        output,
                        report: Some(report),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Failed to process {}: {e}", input.display());
                        BatchEntry {
                            input: input.clone(),
                            output,
                            report: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect::<Vec<_>>()
    };

    let documents = match args.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Cannot start worker pool")?
            .install(run),
        None => run(),
    };

    let failed = documents.iter().filter(|d| d.error.is_some()).count();
    let total_matches = documents
        .iter()
        .filter_map(|d| d.report.as_ref())
        .map(|r| r.total_matches)
        .sum();

    output_result(
        "Batch completed",
        &BatchResult {
            processed: documents.len() - failed,
            failed,
            total_matches,
            duration_ms: start_time.elapsed().as_millis() as u64,
            documents,
        },
        cli_args,
    )
}

/// Whether `path` has the extension `ext`, ignoring case.
fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// `.docx` files directly inside `directory`, sorted by name.
fn docx_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if path.is_file() && has_extension(&path, "docx") && !is_lock_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphmarkError;
    use crate::highlight::pdf::oxide::fixtures::pdf_bytes;
    use clap::Parser;

    #[test]
    fn test_docx_files_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.docx", "a.DOCX", "~$a.docx", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.docx")).unwrap();

        let files = docx_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.DOCX", "b.docx"]);
    }

    #[test]
    fn test_load_terms_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.txt");
        let plain = dir.path().join("plain.txt");
        fs::write(&list, "героин\n").unwrap();
        fs::write(&plain, "Героин\nкот\n").unwrap();

        let terms = TermArgs {
            terms: vec!["лиса".to_string()],
            term_files: vec![plain.clone()],
            lists: vec![(crate::search::phrase::PredefinedList::ProhibitedSubstances, list)],
            patterns: vec![("phone".to_string(), r"\d+".to_string())],
            strategy: None,
        };
        let (phrases, patterns) = load_terms(&terms, &MorphAnalyzer::default()).unwrap();

        let provenance: Vec<_> = phrases
            .iter()
            .map(|p| (p.original_text.as_str(), p.provenance.clone()))
            .collect();
        assert_eq!(
            provenance,
            vec![
                (
                    "героин",
                    Provenance::Predefined(
                        crate::search::phrase::PredefinedList::ProhibitedSubstances
                    )
                ),
                ("кот", Provenance::File(plain)),
                ("лиса", Provenance::FreeText),
            ]
        );
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let terms = TermArgs {
            patterns: vec![("broken".to_string(), "(".to_string())],
            ..TermArgs::default()
        };
        let error = load_terms(&terms, &MorphAnalyzer::default()).unwrap_err();
        assert!(matches!(error, MorphmarkError::Regex(_)));
    }

    #[test]
    fn test_highlight_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.PDF");
        let output = dir.path().join("out.pdf");
        fs::write(&input, pdf_bytes(&["The quick fox jumps"])).unwrap();

        let args = MorphmarkArgs::try_parse_from([
            "morphmark",
            "--quiet",
            "highlight-pdf",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "-t",
            "fox",
        ])
        .unwrap();
        execute_command(args).unwrap();

        let highlighted = OxideDocument::open(&output).unwrap();
        assert_eq!(highlighted.highlights(0).unwrap().len(), 1);
    }

    #[test]
    fn test_batch_names_unreadable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let out = dir.path().join("out");
        let args = MorphmarkArgs::try_parse_from([
            "morphmark",
            "batch",
            missing.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "-t",
            "кот",
        ])
        .unwrap();

        let error = execute_command(args).unwrap_err();
        assert!(matches!(error, MorphmarkError::Anyhow(_)));
        let message = error.to_string();
        assert!(message.starts_with("Cannot list "), "{message}");
        assert!(message.contains("missing"), "{message}");
    }
}
