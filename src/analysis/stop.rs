//! Built-in stop words for standalone single-word search terms.
//!
//! A single-word term whose lemma is listed here is never matched on its own.
//! The list is chosen by script: any Cyrillic letter in the lemma selects the
//! Russian set, everything else is checked against the English set.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analysis::morphology::is_cyrillic;

/// Russian conjunctions, prepositions, particles and every single letter.
const RUSSIAN_STOP_WORDS: &[&str] = &[
    "и", "а", "но", "да", "или", "либо", "то", "не то", "тоже", "также", "зато", "однако", "же",
    "что", "чтобы", "как", "будто", "словно", "если", "когда", "пока", "едва", "лишь",
    "потому что", "так как", "ибо", "оттого что", "поскольку", "хотя", "хоть",
    "несмотря на то что", "пускай", "пусть", "точно", "чем", "так что", "поэтому", "причем",
    "притом", "в", "на", "с", "о", "у", "к", "по", "за", "из", "от", "до", "под", "над", "при",
    "без", "для", "про", "об", "обо", "со", "ко", "из-за", "из-под", "через", "перед", "между",
    "среди", "возле", "около", "вокруг", "вдоль", "вместо", "внутри", "вне", "кроме", "помимо",
    "сверх", "сквозь", "согласно", "благодаря", "вопреки", "навстречу", "ввиду", "вследствие",
    "наподобие", "насчет", "спустя", "не", "бы", "ли", "её", "б", "г", "д", "е", "ё", "ж", "з",
    "й", "л", "м", "н", "п", "р", "т", "ф", "х", "ц", "ч", "ш", "щ", "ъ", "ы", "ь", "э", "ю",
    "я",
];

/// English conjunctions, articles, pronouns and auxiliaries.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "and", "but", "or", "nor", "for", "so", "yet", "after", "although", "as", "because", "before",
    "if", "once", "since", "than", "that", "though", "till", "unless", "until", "when",
    "whenever", "where", "whereas", "wherever", "whether", "while", "a", "an", "the", "this",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us",
    "them", "my", "your", "his", "its", "our", "their", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "will",
    "would", "should", "could", "may", "might", "must", "can",
];

static RUSSIAN: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| RUSSIAN_STOP_WORDS.iter().copied().collect());

static ENGLISH: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Check whether a lemma is a stop word for its script.
pub fn is_stop_word(lemma: &str) -> bool {
    if lemma.is_empty() {
        return false;
    }

    if is_cyrillic(lemma) {
        RUSSIAN.contains(lemma)
    } else {
        ENGLISH.contains(lemma)
    }
}
