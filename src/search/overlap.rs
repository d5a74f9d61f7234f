//! Deterministic selection of non-overlapping matches for highlighting.
//!
//! De-duplication in the searcher is exact-range only, so a phrase and one of
//! its own words can both match intersecting spans. Before a document is
//! mutated the matches are thinned to a non-overlapping set:
//!
//! 1. longer character spans win,
//! 2. then the earlier start,
//! 3. then the match seen first.
//!
//! A match intersecting any already selected span is dropped. The result is
//! returned in ascending start order. Statistics still count every match.

use crate::search::matches::Match;

/// Select the matches that will be highlighted.
pub fn resolve_overlaps(matches: &[Match]) -> Vec<&Match> {
    let mut order: Vec<usize> = (0..matches.len()).collect();
    order.sort_by(|&a, &b| {
        let (ma, mb) = (&matches[a], &matches[b]);
        mb.char_len()
            .cmp(&ma.char_len())
            .then(ma.start.cmp(&mb.start))
            .then(a.cmp(&b))
    });

    let mut kept: Vec<&Match> = Vec::new();
    for index in order {
        let candidate = &matches[index];
        if candidate.char_len() == 0 || kept.iter().any(|m| m.overlaps(candidate)) {
            continue;
        }
        kept.push(candidate);
    }

    kept.sort_by_key(|m| (m.start, m.end));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MorphAnalyzer;
    use crate::search::matches::{MatchKind, MatchTarget};
    use crate::search::phrase::{Phrase, Provenance};
    use std::sync::Arc;

    fn make(source: &[crate::analysis::token::Token], range: (usize, usize), term: &str) -> Match {
        let analyzer = MorphAnalyzer::default();
        let phrase = Arc::new(Phrase::new(&analyzer, term, Provenance::Unspecified));
        Match::new(MatchKind::Phrase, source, range, MatchTarget::Term(phrase), None)
    }

    #[test]
    fn test_longest_wins() {
        let analyzer = MorphAnalyzer::default();
        // quick(0) ' '(1) brown(2) ' '(3) fox(4)
        let source = analyzer.analyze("quick brown fox");
        let matches = vec![
            make(&source, (2, 2), "brown"),
            make(&source, (0, 2), "quick brown"),
            make(&source, (2, 4), "brown fox"),
            make(&source, (4, 4), "fox"),
        ];

        let kept = resolve_overlaps(&matches);
        let texts: Vec<_> = kept.iter().map(|m| m.found_text.as_str()).collect();
        assert_eq!(texts, vec!["quick brown", "fox"]);
    }

    #[test]
    fn test_equal_length_earlier_start_wins() {
        let analyzer = MorphAnalyzer::default();
        // one(0) ' '(1) two(2) ' '(3) six(4)
        let source = analyzer.analyze("one two six");
        let matches = vec![make(&source, (2, 4), "two six"), make(&source, (0, 2), "one two")];

        let kept = resolve_overlaps(&matches);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].found_text, "one two");
    }

    #[test]
    fn test_adjacent_matches_both_kept() {
        let analyzer = MorphAnalyzer::default();
        let source = analyzer.analyze("ab cd");
        let matches = vec![make(&source, (2, 2), "cd"), make(&source, (0, 1), "ab")];

        let kept = resolve_overlaps(&matches);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].found_text, "ab ");
        assert_eq!(kept[1].found_text, "cd");
    }
}
