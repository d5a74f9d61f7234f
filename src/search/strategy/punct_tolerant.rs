//! Word-only matching that ignores punctuation and whitespace.

use crate::analysis::dictionary::TokenDictionary;
use crate::analysis::token::{MatchedBy, Token};
use crate::search::strategy::{MatchStrategy, Span};

/// Compares phrase words with source words in order, skipping punctuation
/// and whitespace tokens on both sides.
///
/// A span runs from the first aligned source word to the last one, so any
/// punctuation between them belongs to the match while punctuation around
/// it does not.
#[derive(Clone, Copy, Debug, Default)]
pub struct PunctuationTolerantStrategy;

impl PunctuationTolerantStrategy {
    /// Try to align `words` (word tokens only) starting at `start`.
    pub fn verify(source: &[Token], words: &[&Token], start: usize) -> Option<Span> {
        if words.is_empty() {
            return None;
        }

        let mut source_i = start;
        let mut match_start = None;
        let mut loosest = MatchedBy::Text;

        for word in words {
            while source_i < source.len() && !source[source_i].is_word() {
                source_i += 1;
            }
            let candidate = source.get(source_i)?;

            loosest = loosest.max(candidate.matches_word(word)?);
            match_start.get_or_insert(source_i);
            source_i += 1;
        }

        Some(Span {
            start: match_start?,
            end: source_i - 1,
            matched_by: loosest,
        })
    }
}

impl MatchStrategy for PunctuationTolerantStrategy {
    fn search(
        &self,
        source: &[Token],
        dictionary: &TokenDictionary,
        phrase: &[Token],
    ) -> Vec<Span> {
        let words: Vec<&Token> = phrase.iter().filter(|t| t.is_word()).collect();
        let Some(first) = words.first() else {
            return Vec::new();
        };

        // Scanning resumes after the last accepted match.
        let mut spans = Vec::new();
        let mut next_start = 0;
        for start in dictionary.find_candidate_positions(first) {
            if start < next_start {
                continue;
            }
            if let Some(span) = Self::verify(source, &words, start) {
                next_start = span.end + 1;
                spans.push(span);
            }
        }
        spans
    }

    fn name(&self) -> &'static str {
        "punctuation_tolerant"
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
        PunctuationTolerantStrategy
            .search(&source, &dictionary, &analyzer.analyze(phrase))
            .into_iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_repeated_word_matches_do_not_overlap() {
        // fox(0) ' '(1) fox(2) ' '(3) fox(4)
        assert_eq!(spans("fox fox fox", "fox fox"), vec![(0, 2)]);
        assert_eq!(spans("fox fox fox fox", "fox fox"), vec![(0, 2), (4, 6)]);
    }

    #[test]
    fn test_skips_inner_punctuation() {
        // quick(0) ,(1) ' '(2) fox(3)
        assert_eq!(spans("quick, fox!", "quick fox"), vec![(0, 3)]);
        assert_eq!(spans("quick fox", "quick - fox"), vec![(0, 2)]);
    }

    #[test]
    fn test_outer_punctuation_not_included() {
        assert_eq!(spans("(quick fox)", "quick fox"), vec![(1, 3)]);
    }

    #[test]
    fn test_word_mismatch_breaks() {
        assert!(spans("quick brown fox", "quick fox").is_empty());
    }

    #[test]
    fn test_source_ends_early() {
        assert!(spans("the end quick", "quick fox").is_empty());
    }

    #[test]
    fn test_every_candidate_verified() {
        assert_eq!(
            spans("Fox. A fox, foxes!", "fox"),
            vec![(0, 0), (5, 5), (8, 8)]
        );
    }
}
