//! Per-term occurrence statistics.
//!
//! Matches are grouped by the search term that produced them (not by the
//! literal text found). Each group counts its total occurrences and how often
//! each surface form was seen.
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::analyzer::MorphAnalyzer;
//! use morphmark::search::{MatchKind, PhraseSet, Provenance, Searcher};
//! use morphmark::stats::Stats;
//!
//! let analyzer = MorphAnalyzer::default();
//! let phrases = PhraseSet::from_terms(&analyzer, ["кот"], Provenance::FreeText);
//! let result = Searcher::new(analyzer).search_text("кот, коты и кот", &phrases, &[]);
//!
//! let mut stats = Stats::new();
//! result.matches.iter().for_each(|m| stats.record(m));
//!
//! let item = stats.get("кот", MatchKind::Word).unwrap();
//! assert_eq!(item.total, 3);
//! assert_eq!(item.form_count("кот"), 2);
//! assert_eq!(item.form_count("коты"), 1);
//! ```

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::UnitFailure;
use crate::search::matches::{Match, MatchKind};

/// Identity of a search term in the statistics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatKey {
    pub text: String,
    pub kind: MatchKind,
}

/// One surface form of a term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatForm {
    pub text: String,
    pub count: usize,

    /// 0-based pages the form occurred on (PDF only)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pages: BTreeSet<usize>,
}

/// Aggregated occurrences of one search term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatItem {
    pub search: StatKey,
    pub total: usize,

    /// Forms in first-seen order
    pub forms: Vec<StatForm>,
}

impl StatItem {
    /// Occurrences of one surface form.
    pub fn form_count(&self, text: &str) -> usize {
        self.forms
            .iter()
            .find(|f| f.text == text)
            .map_or(0, |f| f.count)
    }
}

/// Running aggregation over one document's matches.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    items: Vec<StatItem>,
    index: AHashMap<StatKey, usize>,
    total_matches: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one match.
    pub fn record(&mut self, m: &Match) {
        self.record_on_pages(m, &[]);
    }

    /// Count one match that was found on the given pages.
    pub fn record_on_pages(&mut self, m: &Match, pages: &[usize]) {
        let key = StatKey {
            text: m.search_text.clone(),
            kind: m.kind,
        };
        let items = &mut self.items;
        let slot = *self.index.entry(key.clone()).or_insert_with(|| {
            items.push(StatItem {
                search: key,
                total: 0,
                forms: Vec::new(),
            });
            items.len() - 1
        });

        let item = &mut self.items[slot];
        item.total += 1;

        let form_text = m.found_text.trim();
        let form = match item.forms.iter().position(|f| f.text == form_text) {
            Some(position) => &mut item.forms[position],
            None => {
                item.forms.push(StatForm {
                    text: form_text.to_string(),
                    count: 0,
                    pages: BTreeSet::new(),
                });
                let last = item.forms.len() - 1;
                &mut item.forms[last]
            }
        };
        form.count += 1;
        form.pages.extend(pages.iter().copied());

        self.total_matches += 1;
    }

    pub fn get(&self, text: &str, kind: MatchKind) -> Option<&StatItem> {
        let key = StatKey {
            text: text.to_string(),
            kind,
        };
        self.index.get(&key).map(|&slot| &self.items[slot])
    }

    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted by term text, then kind.
    pub fn into_sorted_items(mut self) -> Vec<StatItem> {
        self.items.sort_by(|a, b| a.search.cmp(&b.search));
        self.items
    }
}

/// Outcome of analysing one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stats: Vec<StatItem>,
    pub total_matches: usize,

    /// Paragraphs or pages that could not be processed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UnitFailure>,
}

impl AnalysisReport {
    pub fn new(stats: Stats, failures: Vec<UnitFailure>) -> Self {
        AnalysisReport {
            total_matches: stats.total_matches(),
            stats: stats.into_sorted_items(),
            failures,
        }
    }

    /// True when every unit was processed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn item(&self, text: &str, kind: MatchKind) -> Option<&StatItem> {
        self.stats
            .iter()
            .find(|item| item.search.text == text && item.search.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MorphAnalyzer;
    use crate::error::{MorphmarkError, Unit};
    use crate::search::phrase::{PhraseSet, Provenance};
    use crate::search::searcher::Searcher;

    fn matches(text: &str, terms: &[&str]) -> Vec<Match> {
        let analyzer = MorphAnalyzer::default();
        let phrases = PhraseSet::from_terms(&analyzer, terms, Provenance::FreeText);
        Searcher::new(analyzer).search_text(text, &phrases, &[]).matches
    }

    #[test]
    fn test_grouped_by_term_not_found_text() {
        let mut stats = Stats::new();
        for m in matches("Кот видел котов. Кот!", &["кот"]) {
            stats.record(&m);
        }

        let item = stats.get("кот", MatchKind::Word).unwrap();
        assert_eq!(item.total, 3);
        assert_eq!(item.form_count("Кот"), 2);
        assert_eq!(item.form_count("котов"), 1);
        assert_eq!(stats.total_matches(), 3);
    }

    #[test]
    fn test_pages_recorded() {
        let mut stats = Stats::new();
        let found = matches("fox fox", &["fox"]);
        stats.record_on_pages(&found[0], &[0]);
        stats.record_on_pages(&found[1], &[2, 3]);

        let item = stats.get("fox", MatchKind::Word).unwrap();
        assert_eq!(item.forms.len(), 1);
        assert_eq!(item.forms[0].pages, BTreeSet::from([0, 2, 3]));
    }

    #[test]
    fn test_report_sorted_and_serializable() {
        let mut stats = Stats::new();
        for m in matches("quick fox and a wolf", &["wolf", "quick fox"]) {
            stats.record(&m);
        }
        let failures = vec![UnitFailure::new(
            Unit::Paragraph(2),
            &MorphmarkError::xml("bad run"),
        )];

        let report = AnalysisReport::new(stats, failures);
        let keys: Vec<_> = report.stats.iter().map(|i| i.search.text.as_str()).collect();
        assert_eq!(keys, vec!["quick fox", "wolf"]);
        assert_eq!(report.total_matches, 2);
        assert!(!report.is_complete());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"][0]["search"]["kind"], "phrase");
        assert_eq!(json["failures"][0]["unit"], "paragraph");
        assert_eq!(json["failures"][0]["index"], 2);
        assert!(json["stats"][0]["forms"][0].get("pages").is_none());
    }
}
