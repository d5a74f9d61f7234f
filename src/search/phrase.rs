//! Search terms and where they came from.
//!
//! A [`Phrase`] is one search term tokenized with the same analyzer as the
//! documents it is matched against. A [`PhraseSet`] is the de-duplicated,
//! searchable collection handed to the searcher.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::MorphAnalyzer;
use crate::analysis::token::Token;

/// Built-in word lists a term can originate from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedList {
    ForeignAgentsPersons,
    ForeignAgentsCompanies,
    ExtremistsTerrorists,
    Profanity,
    ProhibitedSubstances,
    SwearWords,
}

impl PredefinedList {
    pub const ALL: [PredefinedList; 6] = [
        PredefinedList::ForeignAgentsPersons,
        PredefinedList::ForeignAgentsCompanies,
        PredefinedList::ExtremistsTerrorists,
        PredefinedList::Profanity,
        PredefinedList::ProhibitedSubstances,
        PredefinedList::SwearWords,
    ];

    /// Stable identifier, also used as the key for per-list colors.
    pub fn slug(&self) -> &'static str {
        match self {
            PredefinedList::ForeignAgentsPersons => "foreign_agents_persons",
            PredefinedList::ForeignAgentsCompanies => "foreign_agents_companies",
            PredefinedList::ExtremistsTerrorists => "extremists_terrorists",
            PredefinedList::Profanity => "profanity",
            PredefinedList::ProhibitedSubstances => "prohibited_substances",
            PredefinedList::SwearWords => "swear_words",
        }
    }

    /// Human-readable title placed on annotations.
    pub fn title(&self) -> &'static str {
        match self {
            PredefinedList::ForeignAgentsPersons | PredefinedList::ForeignAgentsCompanies => {
                "Иноагенты"
            }
            PredefinedList::ExtremistsTerrorists => "Экстремисты и террористы",
            PredefinedList::Profanity => "Ненормативная лексика",
            PredefinedList::ProhibitedSubstances => "Запрещённые вещества",
            PredefinedList::SwearWords => "Бранные слова",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.slug() == slug)
    }
}

impl fmt::Display for PredefinedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Origin of a search term.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Provenance {
    Predefined(PredefinedList),
    File(PathBuf),
    FreeText,
    #[default]
    Unspecified,
}

impl Provenance {
    /// Slug of the predefined list, if any.
    pub fn list_slug(&self) -> Option<&'static str> {
        match self {
            Provenance::Predefined(list) => Some(list.slug()),
            _ => None,
        }
    }
}

/// A tokenized search term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    /// The term as supplied, trimmed
    pub original_text: String,

    /// Tokens of the term, with morphology
    pub tokens: Vec<Token>,

    pub provenance: Provenance,
}

impl Phrase {
    /// Tokenize `text` into a phrase.
    pub fn new(analyzer: &MorphAnalyzer, text: &str, provenance: Provenance) -> Self {
        let original_text = text.trim().to_string();
        let tokens = analyzer.analyze(&original_text);
        Phrase {
            original_text,
            tokens,
            provenance,
        }
    }

    /// Word tokens of the phrase, in order.
    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_word())
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn is_single_word(&self) -> bool {
        self.word_count() == 1
    }

    /// A phrase without words can never match.
    pub fn is_searchable(&self) -> bool {
        self.words().next().is_some()
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original_text)
    }
}

/// Distinct, searchable phrases in ingestion order.
#[derive(Clone, Debug, Default)]
pub struct PhraseSet {
    phrases: Vec<Arc<Phrase>>,
}

impl PhraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build phrases from raw terms.
    ///
    /// Terms are trimmed, empty ones dropped, duplicates removed by lowercase
    /// text (first spelling wins), and phrases without words discarded.
    pub fn from_terms<I, S>(analyzer: &MorphAnalyzer, terms: I, provenance: Provenance) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = PhraseSet::new();
        set.extend_terms(analyzer, terms, provenance);
        set
    }

    /// Add terms with another provenance, skipping ones already present.
    pub fn extend_terms<I, S>(&mut self, analyzer: &MorphAnalyzer, terms: I, provenance: Provenance)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: AHashSet<String> = self
            .phrases
            .iter()
            .map(|p| p.original_text.to_lowercase())
            .collect();

        for term in terms {
            let trimmed = term.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
                continue;
            }

            let phrase = Phrase::new(analyzer, trimmed, provenance.clone());
            if phrase.is_searchable() {
                self.phrases.push(Arc::new(phrase));
            }
        }
    }

    /// Add an already built phrase. Unsearchable phrases are ignored.
    pub fn push(&mut self, phrase: Phrase) {
        if phrase.is_searchable() {
            self.phrases.push(Arc::new(phrase));
        }
    }

    /// A new set holding only the phrases accepted by `predicate`.
    pub fn filtered<F>(&self, mut predicate: F) -> PhraseSet
    where
        F: FnMut(&Phrase) -> bool,
    {
        PhraseSet {
            phrases: self
                .phrases
                .iter()
                .filter(|p| predicate(p))
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Phrase>> {
        self.phrases.iter()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl<'a> IntoIterator for &'a PhraseSet {
    type Item = &'a Arc<Phrase>;
    type IntoIter = std::slice::Iter<'a, Arc<Phrase>>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}
