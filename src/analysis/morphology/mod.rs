//! Lemma and stem resolution for word tokens.
//!
//! Morphology is split in two layers:
//!
//! - a [`MorphologyProvider`] that knows how to lemmatize and stem a single
//!   lowercase word (and may fail to do so), and
//! - a [`MorphologyService`] that lowercases, applies the fallback-to-word
//!   rule, and memoizes results in a bounded concurrent cache.
//!
//! The service is cheap to clone; clones share one cache, so a service built
//! once can be handed to every worker thread.
//!
//! # Examples
//!
//! ```
//! use morphmark::analysis::morphology::{LemmaTable, MorphologyService, SnowballMorphology};
//!
//! let table = LemmaTable::from_tsv_str("бежал\tбежать\nбежит\tбежать\n").unwrap();
//! let service = MorphologyService::new(SnowballMorphology::with_lemmas(table));
//!
//! assert_eq!(service.lemma("Бежал"), "бежать");
//! assert_eq!(service.lemma("неизвестное"), "неизвестное");
//! ```

pub mod lemma_table;
pub mod snowball;

use std::fmt;
use std::sync::Arc;

use log::debug;
use moka::sync::Cache;

pub use lemma_table::{LemmaTable, PartOfSpeech};
pub use snowball::SnowballMorphology;

/// Default number of distinct words kept in the morphology cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 100_000;

/// Trait for lemmatizers and stemmers.
///
/// Both methods receive an already lowercased word. Returning `None` (or an
/// empty string) means "no answer"; the service then falls back to the word
/// itself.
pub trait MorphologyProvider: Send + Sync {
    /// Dictionary form of the word.
    fn lemma(&self, word: &str) -> Option<String>;

    /// Algorithmic stem of the word.
    fn stem(&self, word: &str) -> Option<String>;

    /// Get the name of this provider (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Lemma and stem of one lowercase word. Neither is ever empty for a
/// non-empty word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordForms {
    pub lemma: String,
    pub stem: String,
}

/// Returns true if the text contains at least one Cyrillic letter.
pub fn is_cyrillic(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}'))
}

/// Memoizing front of a [`MorphologyProvider`].
#[derive(Clone)]
pub struct MorphologyService {
    provider: Arc<dyn MorphologyProvider>,
    cache: Cache<String, Arc<WordForms>>,
}

impl MorphologyService {
    /// Create a service with the default cache capacity.
    pub fn new<P: MorphologyProvider + 'static>(provider: P) -> Self {
        Self::with_capacity(Arc::new(provider), DEFAULT_CACHE_CAPACITY)
    }

    /// Create a service around a shared provider with a bounded cache.
    pub fn with_capacity(provider: Arc<dyn MorphologyProvider>, capacity: u64) -> Self {
        debug!(
            "Creating morphology service with provider '{}' and capacity {}",
            provider.name(),
            capacity
        );
        MorphologyService {
            provider,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Resolve lemma and stem for a word, consulting the cache first.
    pub fn forms(&self, word: &str) -> Arc<WordForms> {
        let lowered = word.to_lowercase();
        if let Some(forms) = self.cache.get(&lowered) {
            return forms;
        }

        let forms = Arc::new(self.resolve(&lowered));
        self.cache.insert(lowered, Arc::clone(&forms));
        forms
    }

    pub fn lemma(&self, word: &str) -> String {
        self.forms(word).lemma.clone()
    }

    pub fn stem(&self, word: &str) -> String {
        self.forms(word).stem.clone()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Approximate number of cached words.
    pub fn cached_words(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    fn resolve(&self, lowered: &str) -> WordForms {
        let lemma = non_empty(self.provider.lemma(lowered)).unwrap_or_else(|| lowered.to_string());
        let stem = non_empty(self.provider.stem(lowered)).unwrap_or_else(|| lowered.to_string());
        WordForms { lemma, stem }
    }
}

impl Default for MorphologyService {
    fn default() -> Self {
        Self::new(SnowballMorphology::new())
    }
}

impl fmt::Debug for MorphologyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphologyService")
            .field("provider", &self.provider.name())
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
