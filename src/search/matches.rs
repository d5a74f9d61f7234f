//! Match records produced by the searcher.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::{MatchedBy, Token, join_text};
use crate::search::phrase::{Phrase, Provenance};
use crate::search::regex::RegexPattern;

/// What kind of search produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Word,
    Phrase,
    Regex,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchKind::Word => "word",
            MatchKind::Phrase => "phrase",
            MatchKind::Regex => "regex",
        };
        write!(f, "{name}")
    }
}

/// The search term a match belongs to.
#[derive(Clone, Debug)]
pub enum MatchTarget {
    Term(Arc<Phrase>),
    Pattern(Arc<RegexPattern>),
}

impl MatchTarget {
    /// Canonical text of the search term (phrase text or pattern name).
    pub fn search_text(&self) -> &str {
        match self {
            MatchTarget::Term(phrase) => &phrase.original_text,
            MatchTarget::Pattern(pattern) => pattern.name(),
        }
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        match self {
            MatchTarget::Term(phrase) => Some(&phrase.provenance),
            MatchTarget::Pattern(_) => None,
        }
    }
}

/// One occurrence of a search term in a token sequence.
#[derive(Clone, Debug, Serialize)]
pub struct Match {
    pub kind: MatchKind,

    /// First source token of the match
    pub start_token_idx: usize,

    /// Last source token of the match (inclusive)
    pub end_token_idx: usize,

    /// Character offset of the match start in the source text
    pub start: usize,

    /// Character offset of the match end in the source text (exclusive)
    pub end: usize,

    /// Canonical search term text
    pub search_text: String,

    /// Concatenated text of the matched source tokens
    pub found_text: String,

    /// Loosest attribute any word needed to match; `None` for patterns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchedBy>,

    #[serde(skip)]
    pub target: MatchTarget,
}

impl Match {
    /// Build a match over `source[start_token_idx..=end_token_idx]`.
    pub fn new(
        kind: MatchKind,
        source: &[Token],
        (start_token_idx, end_token_idx): (usize, usize),
        target: MatchTarget,
        matched_by: Option<MatchedBy>,
    ) -> Self {
        let range = &source[start_token_idx..=end_token_idx];
        Match {
            kind,
            start_token_idx,
            end_token_idx,
            start: range[0].start,
            end: range[range.len() - 1].end,
            search_text: target.search_text().to_string(),
            found_text: join_text(range),
            matched_by,
            target,
        }
    }

    /// Identity used for de-duplication.
    pub fn key(&self) -> (usize, usize) {
        (self.start_token_idx, self.end_token_idx)
    }

    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the character ranges of two matches intersect.
    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.target.provenance()
    }
}
