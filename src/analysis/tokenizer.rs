//! Tokenizer that covers its input with word, punctuation and space tokens.
//!
//! Unlike index-oriented tokenizers, nothing is dropped here: punctuation and
//! whitespace are emitted as tokens too, because document mutators need exact
//! character offsets for every piece of the source text.
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::token::TokenKind;
//! use morphmark::analysis::tokenizer::{Tokenizer, UniversalTokenizer};
//!
//! let tokenizer = UniversalTokenizer::new();
//! let tokens = tokenizer.tokenize("Hello, world!");
//!
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Word,
//!         TokenKind::Punctuation,
//!         TokenKind::Space,
//!         TokenKind::Word,
//!         TokenKind::Punctuation,
//!     ]
//! );
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::analysis::token::{Token, TokenKind};

/// Word run, punctuation run, or whitespace run.
static TOKENIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)|([^\w\s]+)|(\s+)").expect("static pattern is valid"));

/// Trait for tokenizers that convert text into gap-free token sequences.
///
/// Tokenization never fails: any span the pattern cannot classify becomes a
/// punctuation token so that offsets stay contiguous.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text.
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Regex-driven tokenizer producing [`TokenKind::Word`],
/// [`TokenKind::Punctuation`] and [`TokenKind::Space`] tokens.
///
/// Words are maximal runs of Unicode word characters (letters, digits,
/// underscore). The tokens carry no morphology; see
/// [`MorphAnalyzer`](crate::analysis::analyzer::MorphAnalyzer) for that.
#[derive(Clone, Debug)]
pub struct UniversalTokenizer {
    pattern: Arc<Regex>,
}

impl UniversalTokenizer {
    pub fn new() -> Self {
        UniversalTokenizer {
            pattern: Arc::new(TOKENIZE_PATTERN.clone()),
        }
    }
}

impl Default for UniversalTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the character offset matching a byte offset while walking forward.
struct OffsetCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> OffsetCursor<'a> {
    fn new(text: &'a str) -> Self {
        OffsetCursor {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Advance to `byte`, returning the character offset there.
    fn advance_to(&mut self, byte: usize) -> usize {
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

impl Tokenizer for UniversalTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = OffsetCursor::new(text);
        let mut last_end = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            if whole.start() > last_end {
                let start = cursor.chars;
                let end = cursor.advance_to(whole.start());
                tokens.push(Token::new(
                    &text[last_end..whole.start()],
                    TokenKind::Punctuation,
                    (start, end),
                    (last_end, whole.start()),
                ));
            }

            let kind = if caps.get(1).is_some() {
                TokenKind::Word
            } else if caps.get(3).is_some() {
                TokenKind::Space
            } else {
                TokenKind::Punctuation
            };

            let start = cursor.advance_to(whole.start());
            let end = cursor.advance_to(whole.end());
            tokens.push(Token::new(
                whole.as_str(),
                kind,
                (start, end),
                (whole.start(), whole.end()),
            ));
            last_end = whole.end();
        }

        if last_end < text.len() {
            let start = cursor.chars;
            let end = cursor.advance_to(text.len());
            tokens.push(Token::new(
                &text[last_end..],
                TokenKind::Punctuation,
                (start, end),
                (last_end, text.len()),
            ));
        }

        tokens
    }

    fn name(&self) -> &'static str {
        "universal"
    }
}
