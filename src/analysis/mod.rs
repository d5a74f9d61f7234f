//! Text analysis module for Morphmark.
//!
//! This module provides tokenization, morphology (lemmas and stems), the
//! stop-word rule and the per-source token dictionary used by search.

pub mod analyzer;
pub mod dictionary;
pub mod morphology;
pub mod stop;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use dictionary::*;
pub use token::*;
pub use tokenizer::*;
