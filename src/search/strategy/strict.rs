//! Token-for-token matching.

use crate::analysis::dictionary::TokenDictionary;
use crate::analysis::token::{MatchedBy, Token};
use crate::search::strategy::{MatchStrategy, Span};

/// Matches a phrase only where the source has the same token sequence:
/// equal length, equal kinds at every position, words equal by text, lemma
/// or stem, and punctuation or whitespace equal by text.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictStrategy;

impl StrictStrategy {
    /// Compare two equally long token windows.
    pub fn compare(source: &[Token], phrase: &[Token]) -> Option<MatchedBy> {
        if source.len() != phrase.len() {
            return None;
        }

        let mut loosest = MatchedBy::Text;
        for (a, b) in source.iter().zip(phrase) {
            if a.kind != b.kind {
                return None;
            }
            if a.is_word() {
                loosest = loosest.max(a.matches_word(b)?);
            } else if a.text != b.text {
                return None;
            }
        }
        Some(loosest)
    }
}

impl MatchStrategy for StrictStrategy {
    fn search(
        &self,
        source: &[Token],
        dictionary: &TokenDictionary,
        phrase: &[Token],
    ) -> Vec<Span> {
        let Some(offset) = phrase.iter().position(|t| t.is_word()) else {
            return Vec::new();
        };

        dictionary
            .find_candidate_positions(&phrase[offset])
            .into_iter()
            .filter_map(|pos| pos.checked_sub(offset))
            .filter(|&start| start + phrase.len() <= source.len())
            .filter_map(|start| {
                let end = start + phrase.len() - 1;
                Self::compare(&source[start..=end], phrase).map(|matched_by| Span {
                    start,
                    end,
                    matched_by,
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MorphAnalyzer;

    fn spans(source: &str, phrase: &str) -> Vec<(usize, usize)> {
        let analyzer = MorphAnalyzer::default();
        let source = analyzer.analyze(source);
        let dictionary = TokenDictionary::build(&source);
        StrictStrategy
            .search(&source, &dictionary, &analyzer.analyze(phrase))
            .into_iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_exact_punctuation_required() {
        assert_eq!(spans("A, B and A B", "A, B"), vec![(0, 3)]);
        assert_eq!(spans("A, B and A B", "A B"), vec![(7, 9)]);
    }

    #[test]
    fn test_words_match_by_stem() {
        assert_eq!(spans("Коты спят", "кот"), vec![(0, 0)]);
    }

    #[test]
    fn test_leading_punctuation_in_phrase() {
        assert_eq!(spans("say «hello» twice", "«hello»"), vec![(2, 4)]);
    }

    #[test]
    fn test_window_past_end() {
        assert!(spans("quick", "quick fox").is_empty());
    }

    #[test]
    fn test_compare_reports_loosest() {
        let analyzer = MorphAnalyzer::default();
        let a = analyzer.analyze("foxes run");
        let b = analyzer.analyze("fox run");
        assert_eq!(StrictStrategy::compare(&a, &b), Some(MatchedBy::Stem));
        assert_eq!(StrictStrategy::compare(&b, &b), Some(MatchedBy::Text));
    }
}
