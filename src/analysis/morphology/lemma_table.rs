//! Word-to-lemma dictionary loaded from tab-separated text.
//!
//! Each non-empty line is `word<TAB>lemma[<TAB>pos]`. Lines starting with `#`
//! are comments. A word may appear several times with different parts of
//! speech; lookup order depends on the script of the word:
//!
//! - Cyrillic words take the first entry listed (the normal form).
//! - Other words try verb, adjective and noun entries in that order, then
//!   untagged ones. A verb or adjective entry that merely repeats the word is
//!   skipped so a real reduction further down the list can win.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use ahash::AHashMap;

use crate::analysis::morphology::is_cyrillic;
use crate::error::{MorphmarkError, Result};

/// Part-of-speech tag of a lemma entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Verb,
    Adjective,
    Noun,
}

impl FromStr for PartOfSpeech {
    type Err = MorphmarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "v" | "verb" => Ok(PartOfSpeech::Verb),
            "a" | "adj" | "adjective" => Ok(PartOfSpeech::Adjective),
            "n" | "noun" => Ok(PartOfSpeech::Noun),
            other => Err(MorphmarkError::config(format!(
                "Unknown part of speech: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
struct LemmaEntry {
    lemma: String,
    pos: Option<PartOfSpeech>,
}

#[derive(Clone, Debug, Default)]
pub struct LemmaTable {
    entries: AHashMap<String, Vec<LemmaEntry>>,
}

impl LemmaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Words and lemmas are stored lowercase.
    pub fn insert(&mut self, word: &str, lemma: &str, pos: Option<PartOfSpeech>) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(LemmaEntry {
                lemma: lemma.to_lowercase(),
                pos,
            });
    }

    /// Parse a table from TSV text.
    pub fn from_tsv_str(content: &str) -> Result<Self> {
        let mut table = LemmaTable::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let word = fields.next().map(str::trim).unwrap_or_default();
            let lemma = fields.next().map(str::trim).unwrap_or_default();
            if word.is_empty() || lemma.is_empty() {
                return Err(MorphmarkError::config(format!(
                    "Lemma table line {}: expected word<TAB>lemma",
                    line_no + 1
                )));
            }

            let pos = match fields.next().map(str::trim) {
                Some(tag) if !tag.is_empty() => Some(tag.parse().map_err(|e| {
                    MorphmarkError::config(format!("Lemma table line {}: {e}", line_no + 1))
                })?),
                _ => None,
            };

            table.insert(word, lemma, pos);
        }

        Ok(table)
    }

    /// Load a table from a TSV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_tsv_str(&content)
    }

    /// Find the lemma of a lowercase word.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        let entries = self.entries.get(word)?;

        if is_cyrillic(word) {
            return entries.first().map(|e| e.lemma.as_str());
        }

        let tagged = |pos: PartOfSpeech| {
            entries
                .iter()
                .find(|e| e.pos == Some(pos))
                .map(|e| e.lemma.as_str())
        };

        for pos in [PartOfSpeech::Verb, PartOfSpeech::Adjective] {
            if let Some(lemma) = tagged(pos).filter(|l| *l != word) {
                return Some(lemma);
            }
        }

        tagged(PartOfSpeech::Noun)
            .or_else(|| entries.iter().find(|e| e.pos.is_none()).map(|e| e.lemma.as_str()))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
