//! Search-and-highlight pipeline for PDF documents.

use std::sync::Arc;

use ahash::AHashSet;
use log::{debug, info, warn};

use crate::analysis::analyzer::MorphAnalyzer;
use crate::analysis::morphology::MorphologyService;
use crate::config::HighlightConfig;
use crate::error::{MorphmarkError, Result, Unit, UnitFailure};
use crate::highlight::annotation::{AnnotationContentProvider, HighlightAnnotation, ListAnnotations};
use crate::highlight::pdf::collector::{PageCollector, PageText};
use crate::highlight::pdf::document::PdfDocument;
use crate::highlight::pdf::pua::{GlyphOcr, NoOcr, PuaMap};
use crate::progress::{ProgressSink, report_step};
use crate::search::matches::Match;
use crate::search::overlap::resolve_overlaps;
use crate::search::phrase::PhraseSet;
use crate::search::regex::RegexPattern;
use crate::search::searcher::{SearchSource, Searcher};
use crate::stats::{AnalysisReport, Stats};

/// Normalized text of all pages joined by single spaces.
#[derive(Clone, Debug, Default)]
pub struct DocumentText {
    pages: Vec<PageText>,

    /// Char offset of every page in the joined text
    starts: Vec<usize>,
}

impl DocumentText {
    pub fn new(pages: Vec<PageText>) -> Self {
        let mut starts = Vec::with_capacity(pages.len());
        let mut offset = 0;
        for page in &pages {
            starts.push(offset);
            offset += page.len() + 1;
        }
        DocumentText { pages, starts }
    }

    pub fn text(&self) -> String {
        let mut text = String::new();
        for page in &self.pages {
            text.push_str(&page.text());
            text.push(' ');
        }
        text
    }

    pub fn page(&self, index: usize) -> Option<&PageText> {
        self.pages.get(index)
    }

    /// Map a char range of the joined text to page-local ranges.
    pub fn page_ranges(&self, start: usize, end: usize) -> Vec<(usize, usize, usize)> {
        self.starts
            .iter()
            .zip(&self.pages)
            .enumerate()
            .filter_map(|(index, (&page_start, page))| {
                let local_start = start.max(page_start) - page_start;
                let local_end = end.min(page_start + page.len()).saturating_sub(page_start);
                (local_start < local_end).then_some((index, local_start, local_end))
            })
            .collect()
    }
}

/// Highlights every occurrence of a phrase set in a PDF document.
#[derive(Clone)]
pub struct PdfAnalyser {
    searcher: Searcher,
    pua: PuaMap,
    ocr: Arc<dyn GlyphOcr>,
    annotator: Arc<dyn AnnotationContentProvider>,
    config: HighlightConfig,
}

impl PdfAnalyser {
    pub fn new(
        service: MorphologyService,
        pua: PuaMap,
        ocr: Arc<dyn GlyphOcr>,
        annotator: Arc<dyn AnnotationContentProvider>,
        config: HighlightConfig,
    ) -> Self {
        let searcher =
            Searcher::with_strategy(MorphAnalyzer::new(service), config.strategy.build());
        PdfAnalyser {
            searcher,
            pua,
            ocr,
            annotator,
            config,
        }
    }

    pub fn pua_map(&self) -> &PuaMap {
        &self.pua
    }

    /// Collect page text, search the whole document and add one highlight
    /// annotation per kept match and page, split at hyphen wraps.
    ///
    /// Pages that cannot be read or annotated are reported as failures.
    /// A document without pages is an error.
    pub fn analyse(
        &self,
        document: &mut dyn PdfDocument,
        phrases: &PhraseSet,
        patterns: &[Arc<RegexPattern>],
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisReport> {
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(MorphmarkError::document("PDF has no pages"));
        }

        let steps = page_count + 1;
        let mut failures = Vec::new();
        let collector = PageCollector::new(&self.pua, self.ocr.as_ref());
        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            let page = collector.collect(&*document, index).unwrap_or_else(|e| {
                warn!("Skipping page {index}: {e}");
                failures.push(UnitFailure::new(Unit::Page(index), &e));
                PageText::default()
            });
            pages.push(page);
            report_step(progress, index + 1, steps);
        }

        let text = DocumentText::new(pages);
        let source = SearchSource::new(self.searcher.analyzer().analyze(&text.text()));
        let phrases = self.searcher.filter_phrases(&source.dictionary, phrases);
        let matches = self.searcher.search(&source, &phrases, patterns);
        debug!(
            "Found {} matches on {page_count} pages ({} PUA glyphs cached)",
            matches.len(),
            self.pua.len()
        );

        let mut stats = Stats::new();
        for found in &matches {
            let pages: Vec<usize> = text
                .page_ranges(found.start, found.end)
                .into_iter()
                .map(|(page, _, _)| page)
                .collect();
            stats.record_on_pages(found, &pages);
        }

        let mut failed_pages: AHashSet<usize> = failures
            .iter()
            .filter_map(|f: &UnitFailure| match f.unit {
                Unit::Page(page) => Some(page),
                Unit::Paragraph(_) => None,
            })
            .collect();
        for found in resolve_overlaps(&matches) {
            for annotation in self.annotations(&text, found) {
                let page = annotation.page;
                if let Err(e) = document.add_highlight(annotation) {
                    if failed_pages.insert(page) {
                        warn!("Cannot annotate page {page}: {e}");
                        failures.push(UnitFailure::new(Unit::Page(page), &e));
                    }
                }
            }
        }
        report_step(progress, steps, steps);

        info!(
            "Highlighted {} matches of {} terms on {page_count} pages ({} failed)",
            stats.total_matches(),
            phrases.len() + patterns.len(),
            failures.len()
        );
        Ok(AnalysisReport::new(stats, failures))
    }

    fn annotations(&self, text: &DocumentText, found: &Match) -> Vec<HighlightAnnotation> {
        let color = self.config.color_for(found.provenance()).to_pdf_rgb();
        let content = if self.config.annotate {
            self.annotator.describe(found)
        } else {
            None
        };

        let mut annotations = Vec::new();
        for (index, start, end) in text.page_ranges(found.start, found.end) {
            let Some(page) = text.page(index) else {
                continue;
            };
            for (piece_start, piece_end) in page.split_at_wraps(start, end) {
                if let Some(rect) = page.rect(piece_start, piece_end) {
                    annotations.push(HighlightAnnotation {
                        page: index,
                        rect,
                        color,
                        content: content.clone(),
                    });
                }
            }
        }
        annotations
    }
}

impl Default for PdfAnalyser {
    fn default() -> Self {
        Self::new(
            MorphologyService::default(),
            PuaMap::new(),
            Arc::new(NoOcr),
            Arc::new(ListAnnotations),
            HighlightConfig::default(),
        )
    }
}

impl std::fmt::Debug for PdfAnalyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfAnalyser")
            .field("searcher", &self.searcher)
            .field("ocr", &self.ocr.name())
            .field("annotator", &self.annotator.name())
            .field("config", &self.config)
            .finish()
    }
}
