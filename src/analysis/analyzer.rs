//! Analyzer combining tokenization with morphology.

use std::sync::Arc;

use crate::analysis::morphology::MorphologyService;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, UniversalTokenizer};

/// Tokenizes text and fills in lemma and stem for every word token.
///
/// # Examples
///
/// ```
/// use morphmark::analysis::analyzer::MorphAnalyzer;
/// use morphmark::analysis::morphology::MorphologyService;
///
/// let analyzer = MorphAnalyzer::new(MorphologyService::default());
/// let tokens = analyzer.analyze("Foxes run");
///
/// assert_eq!(tokens[0].lemma.as_deref(), Some("foxes"));
/// assert_eq!(tokens[0].stem.as_deref(), Some("fox"));
/// assert!(tokens[1].lemma.is_none());
/// ```
#[derive(Clone)]
pub struct MorphAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    morphology: MorphologyService,
}

impl MorphAnalyzer {
    /// Create an analyzer with the universal tokenizer.
    pub fn new(morphology: MorphologyService) -> Self {
        Self::with_tokenizer(Arc::new(UniversalTokenizer::new()), morphology)
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>, morphology: MorphologyService) -> Self {
        MorphAnalyzer {
            tokenizer,
            morphology,
        }
    }

    /// Tokenize `text` and enrich its word tokens.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for token in tokens.iter_mut().filter(|t| t.is_word()) {
            let forms = self.morphology.forms(&token.text);
            token.lemma = Some(forms.lemma.clone());
            token.stem = Some(forms.stem.clone());
        }
        tokens
    }

    pub fn morphology(&self) -> &MorphologyService {
        &self.morphology
    }

    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }
}

impl Default for MorphAnalyzer {
    fn default() -> Self {
        Self::new(MorphologyService::default())
    }
}

impl std::fmt::Debug for MorphAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("morphology", &self.morphology)
            .finish()
    }
}
