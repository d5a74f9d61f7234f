//! Inverted index over one token sequence.
//!
//! A [`TokenDictionary`] maps every lemma, stem, exact text and lowercase
//! text of the word tokens in its source to the ascending list of token
//! indices where that key occurs. It is built once per source and read-only
//! afterwards, so a lookup replaces a linear scan of the source.
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::analyzer::MorphAnalyzer;
//! use morphmark::analysis::dictionary::TokenDictionary;
//!
//! let analyzer = MorphAnalyzer::default();
//! let source = analyzer.analyze("foxes and a fox");
//! let dictionary = TokenDictionary::build(&source);
//!
//! let query = analyzer.analyze("Fox");
//! assert_eq!(dictionary.find_candidate_positions(&query[0]), vec![0, 6]);
//! ```

use ahash::{AHashMap, AHashSet};

use crate::analysis::token::Token;

#[derive(Clone, Debug, Default)]
pub struct TokenDictionary {
    by_lemma: AHashMap<String, Vec<usize>>,
    by_stem: AHashMap<String, Vec<usize>>,
    by_text: AHashMap<String, Vec<usize>>,
    by_text_lower: AHashMap<String, Vec<usize>>,
    word_count: usize,
}

impl TokenDictionary {
    /// Index the word tokens of `tokens` in one pass.
    pub fn build(tokens: &[Token]) -> Self {
        let mut dictionary = TokenDictionary::default();

        for (index, token) in tokens.iter().enumerate().filter(|(_, t)| t.is_word()) {
            if let Some(lemma) = &token.lemma {
                dictionary.by_lemma.entry(lemma.clone()).or_default().push(index);
            }
            if let Some(stem) = &token.stem {
                dictionary.by_stem.entry(stem.clone()).or_default().push(index);
            }
            dictionary
                .by_text
                .entry(token.text.clone())
                .or_default()
                .push(index);
            dictionary
                .by_text_lower
                .entry(token.text.to_lowercase())
                .or_default()
                .push(index);
            dictionary.word_count += 1;
        }

        dictionary
    }

    /// Ascending, de-duplicated source indices where `token` could match.
    pub fn find_candidate_positions(&self, token: &Token) -> Vec<usize> {
        if !token.is_word() {
            return Vec::new();
        }

        let mut seen = AHashSet::new();
        let mut positions: Vec<usize> = self
            .lists_for(token)
            .flat_map(|list| list.iter().copied())
            .filter(|index| seen.insert(*index))
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Whether `token` occurs anywhere in the source.
    pub fn has_token(&self, token: &Token) -> bool {
        token.is_word() && self.lists_for(token).any(|list| !list.is_empty())
    }

    /// Keep only the tokens that occur somewhere in the source.
    pub fn filter_tokens<'a>(&self, tokens: &'a [Token]) -> Vec<&'a Token> {
        tokens.iter().filter(|t| self.has_token(t)).collect()
    }

    /// Whether every word of `tokens` occurs somewhere in the source.
    pub fn contains_all_words(&self, tokens: &[Token]) -> bool {
        tokens
            .iter()
            .filter(|t| t.is_word())
            .all(|t| self.has_token(t))
    }

    /// Number of indexed word tokens.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    fn lists_for<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Vec<usize>> + 'a {
        let lemma = token.lemma.as_ref().and_then(|l| self.by_lemma.get(l));
        let stem = token.stem.as_ref().and_then(|s| self.by_stem.get(s));
        let text = self.by_text.get(&token.text);
        let lower = self.by_text_lower.get(&token.text.to_lowercase());
        [lemma, stem, text, lower].into_iter().flatten()
    }
}
