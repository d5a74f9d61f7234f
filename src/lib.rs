//! # Morphmark
//!
//! Morphology-aware search for words and phrases, with in-place
//! highlighting of the matches in word-processor and PDF documents.
//!
//! ## Features
//!
//! - Tokenization that reproduces the source text exactly
//! - Matching by surface text, lemma or stem, with a bounded shared cache
//! - Strict and punctuation-tolerant phrase strategies
//! - Regex patterns alongside term lists
//! - `.docx` run splitting that keeps the original formatting
//! - PDF highlight annotations built from per-glyph boxes
//! - Per-term statistics of every surface form found
//!
//! ## Example
//!
//! ```
//! use morphmark::analysis::MorphAnalyzer;
//! use morphmark::search::{MatchKind, PhraseSet, Provenance, Searcher};
//!
//! let analyzer = MorphAnalyzer::default();
//! let phrases = PhraseSet::from_terms(&analyzer, ["quick fox"], Provenance::FreeText);
//! let result = Searcher::new(analyzer).search_text("The quick Fox jumps.", &phrases, &[]);
//!
//! assert_eq!(result.matches.len(), 1);
//! assert_eq!(result.matches[0].kind, MatchKind::Phrase);
//! assert_eq!(result.matches[0].found_text, "quick Fox");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod progress;
pub mod search;
pub mod stats;

pub mod prelude {
    pub use crate::analysis::morphology::{LemmaTable, MorphologyService, SnowballMorphology};
    pub use crate::analysis::{MorphAnalyzer, Token, TokenKind};
    pub use crate::config::{HighlightConfig, HighlightStyle};
    pub use crate::error::{MorphmarkError, Result};
    pub use crate::highlight::{
        DocxAnalyser, DocxPackage, OxideDocument, PdfAnalyser, PdfDocument, RawDictDocument,
    };
    pub use crate::progress::{NoProgress, ProgressSink};
    pub use crate::search::{
        Match, MatchKind, PhraseSet, PredefinedList, Provenance, RegexPattern, Searcher,
        StrategyKind,
    };
    pub use crate::stats::{AnalysisReport, Stats};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
