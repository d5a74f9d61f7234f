//! Snowball-based morphology provider.
//!
//! Stems come from the Snowball algorithms (Russian for Cyrillic words,
//! English otherwise). Lemmas come from an optional [`LemmaTable`]; without
//! one every lemma lookup misses and the service falls back to the word.

use rust_stemmers::{Algorithm, Stemmer};

use crate::analysis::morphology::{LemmaTable, MorphologyProvider, is_cyrillic};

pub struct SnowballMorphology {
    russian: Stemmer,
    english: Stemmer,
    lemmas: Option<LemmaTable>,
}

impl SnowballMorphology {
    /// Stemming only.
    pub fn new() -> Self {
        SnowballMorphology {
            russian: Stemmer::create(Algorithm::Russian),
            english: Stemmer::create(Algorithm::English),
            lemmas: None,
        }
    }

    /// Stemming plus dictionary lemmas.
    pub fn with_lemmas(lemmas: LemmaTable) -> Self {
        SnowballMorphology {
            lemmas: Some(lemmas),
            ..Self::new()
        }
    }
}

impl Default for SnowballMorphology {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphologyProvider for SnowballMorphology {
    fn lemma(&self, word: &str) -> Option<String> {
        self.lemmas
            .as_ref()
            .and_then(|table| table.lookup(word))
            .map(str::to_string)
    }

    fn stem(&self, word: &str) -> Option<String> {
        let stemmer = if is_cyrillic(word) {
            &self.russian
        } else {
            &self.english
        };
        Some(stemmer.stem(word).into_owned())
    }

    fn name(&self) -> &'static str {
        "snowball"
    }
}
