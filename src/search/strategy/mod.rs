//! Phrase matching strategies.
//!
//! A strategy decides whether a phrase occurs at a given place in a source
//! token sequence. Two strategies are provided:
//!
//! - [`StrictStrategy`]: every phrase token must line up with a source token
//!   of the same kind, so punctuation and spacing must be identical.
//! - [`PunctuationTolerantStrategy`]: only words are compared; punctuation and
//!   whitespace are skipped. This is the default.
//!
//! Word tokens are compared with [`Token::matches_word`] (text, lemma or
//! stem).

pub mod punct_tolerant;
pub mod strict;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::dictionary::TokenDictionary;
use crate::analysis::token::{MatchedBy, Token};
use crate::error::MorphmarkError;

pub use punct_tolerant::PunctuationTolerantStrategy;
pub use strict::StrictStrategy;

/// A verified phrase occurrence in source token coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// First matched source token
    pub start: usize,
    /// Last matched source token (inclusive)
    pub end: usize,
    /// Loosest attribute any word comparison needed
    pub matched_by: MatchedBy,
}

/// Trait for phrase matching algorithms.
pub trait MatchStrategy: Send + Sync {
    /// Find every occurrence of `phrase` in `source`.
    ///
    /// `dictionary` must have been built from `source`; it is used to limit
    /// verification to plausible start positions.
    fn search(&self, source: &[Token], dictionary: &TokenDictionary, phrase: &[Token])
    -> Vec<Span>;

    /// Get the name of this strategy (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Strategy selector used by configuration and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Strict,
    #[default]
    PunctuationTolerant,
}

impl StrategyKind {
    pub fn build(&self) -> Arc<dyn MatchStrategy> {
        match self {
            StrategyKind::Strict => Arc::new(StrictStrategy),
            StrategyKind::PunctuationTolerant => Arc::new(PunctuationTolerantStrategy),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Strict => write!(f, "strict"),
            StrategyKind::PunctuationTolerant => write!(f, "punctuation_tolerant"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = MorphmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(StrategyKind::Strict),
            "punctuation_tolerant" | "punctuation-tolerant" => {
                Ok(StrategyKind::PunctuationTolerant)
            }
            other => Err(MorphmarkError::config(format!("Unknown strategy: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::MorphAnalyzer;

    fn search(kind: StrategyKind, source: &str, phrase: &str) -> Vec<Span> {
        let analyzer = MorphAnalyzer::default();
        let source = analyzer.analyze(source);
        let dictionary = TokenDictionary::build(&source);
        let phrase = analyzer.analyze(phrase);
        kind.build().search(&source, &dictionary, &phrase)
    }

    #[test]
    fn test_punctuation_sensitivity() {
        assert!(search(StrategyKind::Strict, "A B", "A, B").is_empty());

        let spans = search(StrategyKind::PunctuationTolerant, "A B", "A, B");
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (0, 2));
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!("strict".parse::<StrategyKind>().unwrap(), StrategyKind::Strict);
        assert_eq!(
            "punctuation-tolerant".parse::<StrategyKind>().unwrap(),
            StrategyKind::PunctuationTolerant
        );
        assert!("fuzzy".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::default().build().name(), "punctuation_tolerant");
    }
}
