//! Multi-phrase search over one token sequence.
//!
//! The [`Searcher`] runs every phrase of a [`PhraseSet`] (and optionally a
//! list of regex patterns) against a source in a single pass, using the
//! source's [`TokenDictionary`] to restrict verification to candidate start
//! positions. Results are de-duplicated by token range, first seen wins, and
//! returned ordered by start token.
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::analyzer::MorphAnalyzer;
//! use morphmark::search::phrase::{PhraseSet, Provenance};
//! use morphmark::search::searcher::Searcher;
//!
//! let analyzer = MorphAnalyzer::default();
//! let searcher = Searcher::new(analyzer.clone());
//! let phrases = PhraseSet::from_terms(&analyzer, ["quick fox"], Provenance::FreeText);
//!
//! let result = searcher.search_text("The quick Fox jumps.", &phrases, &[]);
//! assert_eq!(result.matches.len(), 1);
//! assert_eq!(result.matches[0].found_text, "quick Fox");
//! ```

use std::sync::Arc;

use ahash::AHashSet;
use log::debug;

use crate::analysis::analyzer::MorphAnalyzer;
use crate::analysis::dictionary::TokenDictionary;
use crate::analysis::stop::is_stop_word;
use crate::analysis::token::{Token, join_text};
use crate::search::matches::{Match, MatchKind, MatchTarget};
use crate::search::phrase::{Phrase, PhraseSet};
use crate::search::regex::RegexPattern;
use crate::search::strategy::{MatchStrategy, PunctuationTolerantStrategy};

/// Tokens of a searched text together with their dictionary.
#[derive(Clone, Debug)]
pub struct SearchSource {
    pub tokens: Vec<Token>,
    pub dictionary: TokenDictionary,
}

impl SearchSource {
    pub fn new(tokens: Vec<Token>) -> Self {
        let dictionary = TokenDictionary::build(&tokens);
        SearchSource { tokens, dictionary }
    }

    pub fn text(&self) -> String {
        join_text(&self.tokens)
    }
}

/// Matches found in one source, plus the source itself.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub source: SearchSource,
    pub matches: Vec<Match>,
}

/// Runs a [`MatchStrategy`] for many phrases at once.
#[derive(Clone)]
pub struct Searcher {
    analyzer: MorphAnalyzer,
    strategy: Arc<dyn MatchStrategy>,
}

impl Searcher {
    /// Create a searcher with the punctuation-tolerant strategy.
    pub fn new(analyzer: MorphAnalyzer) -> Self {
        Self::with_strategy(analyzer, Arc::new(PunctuationTolerantStrategy))
    }

    pub fn with_strategy(analyzer: MorphAnalyzer, strategy: Arc<dyn MatchStrategy>) -> Self {
        Searcher { analyzer, strategy }
    }

    pub fn analyzer(&self) -> &MorphAnalyzer {
        &self.analyzer
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Analyze `text` and search it.
    pub fn search_text(
        &self,
        text: &str,
        phrases: &PhraseSet,
        patterns: &[Arc<RegexPattern>],
    ) -> SearchResult {
        let source = SearchSource::new(self.analyzer.analyze(text));
        let matches = self.search(&source, phrases, patterns);
        SearchResult { source, matches }
    }

    /// Search an analyzed source for every phrase and pattern.
    pub fn search(
        &self,
        source: &SearchSource,
        phrases: &PhraseSet,
        patterns: &[Arc<RegexPattern>],
    ) -> Vec<Match> {
        if source.tokens.is_empty() {
            return Vec::new();
        }

        let mut seen = AHashSet::new();
        let mut matches = Vec::new();

        for phrase in phrases {
            if Self::is_standalone_stop_word(phrase) {
                debug!("Skipping stop word '{}'", phrase.original_text);
                continue;
            }

            let kind = if phrase.is_single_word() {
                MatchKind::Word
            } else {
                MatchKind::Phrase
            };

            for span in self
                .strategy
                .search(&source.tokens, &source.dictionary, &phrase.tokens)
            {
                let found = Match::new(
                    kind,
                    &source.tokens,
                    (span.start, span.end),
                    MatchTarget::Term(Arc::clone(phrase)),
                    Some(span.matched_by),
                );
                if seen.insert(found.key()) {
                    matches.push(found);
                }
            }
        }

        if !patterns.is_empty() {
            let text = source.text();
            for pattern in patterns {
                for range in pattern.find_token_ranges(&text, &source.tokens) {
                    let found = Match::new(
                        MatchKind::Regex,
                        &source.tokens,
                        range,
                        MatchTarget::Pattern(Arc::clone(pattern)),
                        None,
                    );
                    if seen.insert(found.key()) {
                        matches.push(found);
                    }
                }
            }
        }

        // Stable, so equal starts keep first-seen order.
        matches.sort_by_key(|m| m.start_token_idx);
        matches
    }

    /// Keep only the phrases whose every word occurs somewhere in `dictionary`.
    pub fn filter_phrases(&self, dictionary: &TokenDictionary, phrases: &PhraseSet) -> PhraseSet {
        let filtered = phrases.filtered(|phrase| dictionary.contains_all_words(&phrase.tokens));
        debug!(
            "Document-level filter kept {} of {} phrases",
            filtered.len(),
            phrases.len()
        );
        filtered
    }

    /// Single-word terms whose lemma is a stop word never match on their own.
    fn is_standalone_stop_word(phrase: &Phrase) -> bool {
        let mut words = phrase.words();
        match (words.next(), words.next()) {
            (Some(word), None) => word.lemma.as_deref().is_some_and(is_stop_word),
            _ => false,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(MorphAnalyzer::default())
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("analyzer", &self.analyzer)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
