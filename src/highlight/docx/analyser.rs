//! Search-and-highlight pipeline for `.docx` documents.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::analyzer::MorphAnalyzer;
use crate::analysis::morphology::MorphologyService;
use crate::config::{HighlightConfig, HighlightStyle};
use crate::error::{Result, Unit, UnitFailure};
use crate::highlight::docx::mutator::{
    BatchMutator, RunHighlight, document_paragraphs, paragraph_batches, paragraph_text,
};
use crate::highlight::docx::package::DocxPackage;
use crate::highlight::docx::xml::{NodeId, XmlTree};
use crate::progress::{ProgressSink, report_step};
use crate::search::matches::Match;
use crate::search::overlap::resolve_overlaps;
use crate::search::phrase::PhraseSet;
use crate::search::regex::RegexPattern;
use crate::search::searcher::{SearchSource, Searcher};
use crate::stats::{AnalysisReport, Stats};

/// Highlights every occurrence of a phrase set in a `.docx` document.
#[derive(Clone, Debug)]
pub struct DocxAnalyser {
    searcher: Searcher,
    config: HighlightConfig,
}

impl DocxAnalyser {
    pub fn new(service: MorphologyService, config: HighlightConfig) -> Self {
        let searcher =
            Searcher::with_strategy(MorphAnalyzer::new(service), config.strategy.build());
        DocxAnalyser { searcher, config }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Search every paragraph and highlight the matches in place.
    ///
    /// A paragraph that cannot be mutated is recorded as a failure in the
    /// report and the remaining paragraphs are still processed. A document
    /// without a body is an error.
    pub fn analyse(
        &self,
        package: &mut DocxPackage,
        phrases: &PhraseSet,
        patterns: &[Arc<RegexPattern>],
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisReport> {
        let body = package.body()?;
        let tree = package.document_mut();
        let paragraphs = document_paragraphs(tree, body);

        let phrases = self.document_phrases(tree, &paragraphs, phrases);
        debug!(
            "Searching {} paragraphs for {} phrases and {} patterns",
            paragraphs.len(),
            phrases.len(),
            patterns.len()
        );

        let mut stats = Stats::new();
        let mut failures = Vec::new();

        if phrases.is_empty() && patterns.is_empty() {
            report_step(progress, paragraphs.len(), paragraphs.len());
            return Ok(AnalysisReport::new(stats, failures));
        }

        for (index, &paragraph) in paragraphs.iter().enumerate() {
            if let Err(e) = self.analyse_paragraph(tree, paragraph, &phrases, patterns, &mut stats)
            {
                warn!("Paragraph {index} left partially highlighted: {e}");
                failures.push(UnitFailure::new(Unit::Paragraph(index), &e));
            }
            report_step(progress, index + 1, paragraphs.len());
        }

        info!(
            "Highlighted {} matches of {} terms in {} paragraphs ({} failed)",
            stats.total_matches(),
            phrases.len() + patterns.len(),
            paragraphs.len(),
            failures.len()
        );
        Ok(AnalysisReport::new(stats, failures))
    }

    /// Drop the phrases that cannot occur anywhere in the document.
    fn document_phrases(
        &self,
        tree: &XmlTree,
        paragraphs: &[NodeId],
        phrases: &PhraseSet,
    ) -> PhraseSet {
        let text = paragraphs
            .iter()
            .map(|&paragraph| paragraph_text(tree, paragraph))
            .collect::<Vec<_>>()
            .join(" ");
        let document = SearchSource::new(self.searcher.analyzer().analyze(&text));
        self.searcher.filter_phrases(&document.dictionary, phrases)
    }

    fn analyse_paragraph(
        &self,
        tree: &mut XmlTree,
        paragraph: NodeId,
        phrases: &PhraseSet,
        patterns: &[Arc<RegexPattern>],
        stats: &mut Stats,
    ) -> Result<()> {
        for batch in paragraph_batches(tree, paragraph) {
            let mut mutator = BatchMutator::new(tree, batch);
            let text = mutator.text();
            if text.trim().is_empty() {
                continue;
            }

            let result = self.searcher.search_text(&text, phrases, patterns);
            for found in &result.matches {
                stats.record(found);
            }

            for found in resolve_overlaps(&result.matches) {
                mutator.highlight(found.start, found.end, &self.run_highlight(found))?;
            }
        }
        Ok(())
    }

    fn run_highlight(&self, found: &Match) -> RunHighlight {
        let color = self.config.color_for(found.provenance());
        match self.config.style {
            HighlightStyle::Highlight => RunHighlight::Named(color.nearest_highlight_name()),
            HighlightStyle::Shading => RunHighlight::Fill(color.to_ooxml_fill()),
        }
    }
}

impl Default for DocxAnalyser {
    fn default() -> Self {
        Self::new(MorphologyService::default(), HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::highlight::docx::package::fixtures::docx_bytes;
    use crate::progress::NoProgress;
    use crate::search::matches::MatchKind;
    use crate::search::phrase::{PredefinedList, Provenance};

    fn run(text: &str) -> String {
        format!(r#"<w:r><w:t xml:space="preserve">{text}</w:t></w:r>"#)
    }

    fn paragraph(runs: &[&str]) -> String {
        let runs: String = runs.iter().map(|text| run(text)).collect();
        format!("<w:p>{runs}</w:p>")
    }

    fn texts(package: &DocxPackage) -> Vec<String> {
        let tree = package.document();
        let body = package.body().unwrap();
        document_paragraphs(tree, body)
            .into_iter()
            .map(|p| paragraph_text(tree, p))
            .collect()
    }

    fn highlighted(package: &DocxPackage) -> Vec<String> {
        let tree = package.document();
        let body = package.body().unwrap();
        tree.descendants(body)
            .filter(|&node| tree.is_named(node, "w:r"))
            .filter(|&run| {
                tree.first_child_named(run, "w:rPr")
                    .and_then(|props| tree.first_child_named(props, "w:highlight"))
                    .is_some()
            })
            .map(|run| crate::highlight::docx::mutator::run_text(tree, run))
            .collect()
    }

    fn terms(analyser: &DocxAnalyser, terms: &[&str]) -> PhraseSet {
        PhraseSet::from_terms(analyser.searcher.analyzer(), terms, Provenance::FreeText)
    }

    #[test]
    fn test_phrase_across_runs() {
        let body = paragraph(&["The qu", "ick Fox", " jumps."]);
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let analyser = DocxAnalyser::default();

        let report = analyser
            .analyse(&mut package, &terms(&analyser, &["quick fox"]), &[], &NoProgress)
            .unwrap();

        assert_eq!(report.total_matches, 1);
        let item = report.item("quick fox", MatchKind::Phrase).unwrap();
        assert_eq!(item.form_count("quick Fox"), 1);
        assert_eq!(highlighted(&package), vec!["qu", "ick Fox"]);
        assert_eq!(texts(&package), vec!["The quick Fox jumps."]);
    }

    #[test]
    fn test_empty_terms_leave_text_unchanged() {
        let body = format!(
            "{}{}",
            paragraph(&["One ", "two"]),
            paragraph(&["three"])
        );
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let before = texts(&package);

        let report = DocxAnalyser::default()
            .analyse(&mut package, &PhraseSet::new(), &[], &NoProgress)
            .unwrap();

        assert_eq!(report.total_matches, 0);
        assert_eq!(texts(&package), before);
    }

    #[test]
    fn test_overlapping_matches_highlight_longest() {
        let body = paragraph(&["a quick fox ran"]);
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let analyser = DocxAnalyser::default();

        let report = analyser
            .analyse(
                &mut package,
                &terms(&analyser, &["fox", "quick fox"]),
                &[],
                &NoProgress,
            )
            .unwrap();

        assert_eq!(report.total_matches, 2);
        assert_eq!(highlighted(&package), vec!["quick fox"]);
    }

    #[test]
    fn test_table_paragraphs_and_progress() {
        let cell = format!("<w:tc>{}</w:tc>", paragraph(&["wolf in a cell"]));
        let body = format!(
            "{}<w:tbl><w:tr>{cell}</w:tr></w:tbl>",
            paragraph(&["no match here"])
        );
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let analyser = DocxAnalyser::default();

        let seen = Mutex::new(Vec::new());
        let sink = |f: f64| seen.lock().unwrap().push(f);
        let report = analyser
            .analyse(&mut package, &terms(&analyser, &["wolf"]), &[], &sink)
            .unwrap();

        assert_eq!(report.total_matches, 1);
        assert_eq!(highlighted(&package), vec!["wolf"]);
        assert_eq!(*seen.lock().unwrap(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_list_color_and_shading() {
        let body = paragraph(&["bad word"]);
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let config = HighlightConfig::new()
            .style(HighlightStyle::Shading)
            .list_color("profanity", "#ff0000");
        let analyser = DocxAnalyser::new(MorphologyService::default(), config);
        let phrases = PhraseSet::from_terms(
            analyser.searcher.analyzer(),
            ["word"],
            Provenance::Predefined(PredefinedList::Profanity),
        );

        analyser
            .analyse(&mut package, &phrases, &[], &NoProgress)
            .unwrap();

        let xml = package.document().to_xml().unwrap();
        assert!(xml.contains(r#"<w:shd w:val="clear" w:color="auto" w:fill="FF0000"/>"#));
    }

    #[test]
    fn test_regex_pattern() {
        let body = paragraph(&["call 555-0100 now"]);
        let mut package = DocxPackage::from_bytes(docx_bytes(&body)).unwrap();
        let pattern = Arc::new(RegexPattern::new("phone", r"\d{3}-\d{4}").unwrap());

        let report = DocxAnalyser::default()
            .analyse(&mut package, &PhraseSet::new(), &[pattern], &NoProgress)
            .unwrap();

        assert_eq!(report.item("phone", MatchKind::Regex).unwrap().total, 1);
        assert_eq!(highlighted(&package), vec!["555-0100"]);
    }

    #[test]
    fn test_missing_body_is_systemic() {
        let mut package = DocxPackage::from_bytes(docx_bytes("")).unwrap();
        let root = package.document().root_element().unwrap();
        let body = package.body().unwrap();
        package.document_mut().detach(body);
        assert!(package.document().first_child_named(root, "w:body").is_none());

        let error = DocxAnalyser::default()
            .analyse(&mut package, &PhraseSet::new(), &[], &NoProgress)
            .unwrap_err();
        assert!(error.is_systemic());
    }
}
