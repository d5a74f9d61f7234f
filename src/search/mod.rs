//! Phrase search.
//!
//! This module turns search terms into [`Phrase`]s, matches them against
//! analyzed text with a pluggable [`MatchStrategy`], and selects the
//! non-overlapping subset of matches that document mutators highlight.

pub mod matches;
pub mod overlap;
pub mod phrase;
pub mod regex;
pub mod searcher;
pub mod strategy;
pub mod terms;

pub use matches::{Match, MatchKind, MatchTarget};
pub use overlap::resolve_overlaps;
pub use phrase::{Phrase, PhraseSet, PredefinedList, Provenance};
pub use regex::RegexPattern;
pub use searcher::{SearchResult, SearchSource, Searcher};
pub use strategy::{MatchStrategy, StrategyKind};
pub use terms::read_terms;
