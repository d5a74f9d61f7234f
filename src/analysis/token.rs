//! Token types for morphological analysis.
//!
//! A [`Token`] is the smallest unit produced by tokenization: a run of word
//! characters, a run of whitespace, or a run of anything else. Tokens cover
//! their source text with no gaps, so concatenating the text of every token
//! reproduces the input exactly.
//!
//! # Offsets
//!
//! Each token carries two pairs of half-open offsets into the text it was
//! tokenized from:
//!
//! - `start` / `end` - character offsets (what document mutators use)
//! - `byte_start` / `byte_end` - byte offsets (for slicing the source `str`)
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::token::{Token, TokenKind};
//!
//! let token = Token::word("Fox", 10, 13, 10, 13)
//!     .with_lemma("fox")
//!     .with_stem("fox");
//!
//! assert_eq!(token.kind, TokenKind::Word);
//! assert_eq!(token.lemma.as_deref(), Some("fox"));
//! assert_eq!(token.char_len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a token's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A maximal run of letters, digits or underscores
    Word,
    /// A maximal run of characters that are neither word nor whitespace
    Punctuation,
    /// A maximal run of whitespace
    Space,
}

/// A single token with offsets and, for words, its lemma and stem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The surface text of the token
    pub text: String,

    /// Character offset where this token starts
    pub start: usize,

    /// Character offset where this token ends (exclusive)
    pub end: usize,

    /// Byte offset where this token starts
    pub byte_start: usize,

    /// Byte offset where this token ends (exclusive)
    pub byte_end: usize,

    /// Token classification
    pub kind: TokenKind,

    /// Dictionary form, present for words only
    pub lemma: Option<String>,

    /// Algorithmic stem, present for words only
    pub stem: Option<String>,
}

impl Token {
    /// Create a token of the given kind without morphology.
    pub fn new<S: Into<String>>(
        text: S,
        kind: TokenKind,
        (start, end): (usize, usize),
        (byte_start, byte_end): (usize, usize),
    ) -> Self {
        Token {
            text: text.into(),
            start,
            end,
            byte_start,
            byte_end,
            kind,
            lemma: None,
            stem: None,
        }
    }

    /// Create a word token.
    pub fn word<S: Into<String>>(
        text: S,
        start: usize,
        end: usize,
        byte_start: usize,
        byte_end: usize,
    ) -> Self {
        Self::new(text, TokenKind::Word, (start, end), (byte_start, byte_end))
    }

    /// Set the lemma.
    pub fn with_lemma<S: Into<String>>(mut self, lemma: S) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Set the stem.
    pub fn with_stem<S: Into<String>>(mut self, stem: S) -> Self {
        self.stem = Some(stem.into());
        self
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Number of characters covered by this token.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    /// Loose equivalence: identical text, or both lemma and stem agree.
    ///
    /// This is stricter than the search match rule, which accepts any one
    /// of text, lemma or stem.
    pub fn is_equal(&self, other: &Token) -> bool {
        if self.text == other.text {
            return true;
        }

        let lemma_match = matches!((&self.lemma, &other.lemma), (Some(a), Some(b)) if a == b);
        let stem_match = matches!((&self.stem, &other.stem), (Some(a), Some(b)) if a == b);

        lemma_match && stem_match
    }

    /// Compare two word tokens with the search rule (text OR lemma OR stem),
    /// reporting which attribute succeeded first.
    pub fn matches_word(&self, other: &Token) -> Option<MatchedBy> {
        if !self.is_word() || !other.is_word() {
            return None;
        }

        if self.text == other.text {
            return Some(MatchedBy::Text);
        }
        if self.lemma.is_some() && self.lemma == other.lemma {
            return Some(MatchedBy::Lemma);
        }
        if self.stem.is_some() && self.stem == other.stem {
            return Some(MatchedBy::Stem);
        }

        None
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Which word attribute satisfied a comparison. Kept for provenance only.
///
/// Ordered from the most to the least exact, so the maximum over a phrase is
/// the loosest comparison it needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    Text,
    Lemma,
    Stem,
}

/// Concatenate the text of a token slice.
pub fn join_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
