//! Highlighting configuration.
//!
//! Configuration can be built in code with the builder-style setters or
//! loaded from JSON; every field is optional in the file.
//!
//! ```json
//! {
//!   "style": "shading",
//!   "default_color": "#ffff00",
//!   "list_colors": { "profanity": "#ff0000" },
//!   "strategy": "strict"
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::morphology::DEFAULT_CACHE_CAPACITY;
use crate::error::{MorphmarkError, Result};
use crate::highlight::color::Rgb;
use crate::search::phrase::Provenance;
use crate::search::strategy::StrategyKind;

/// How highlighted DOCX runs are marked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// `w:highlight` with the nearest named color
    #[default]
    Highlight,
    /// `w:shd` with an exact fill color
    Shading,
}

/// Configuration for document highlighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// DOCX run marking style.
    pub style: HighlightStyle,

    /// Color for terms without a list color, as `#RRGGBB`.
    pub default_color: String,

    /// Per predefined-list colors, keyed by list slug.
    pub list_colors: HashMap<String, String>,

    /// Phrase matching strategy.
    pub strategy: StrategyKind,

    /// Number of words kept in the morphology cache.
    pub morphology_cache_capacity: u64,

    /// Whether PDF annotations carry title and body text.
    pub annotate: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            style: HighlightStyle::Highlight,
            default_color: "#00ff00".to_string(),
            list_colors: HashMap::new(),
            strategy: StrategyKind::PunctuationTolerant,
            morphology_cache_capacity: DEFAULT_CACHE_CAPACITY,
            annotate: true,
        }
    }
}

impl HighlightConfig {
    /// Create a new highlight configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: HighlightConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every configured color parses.
    pub fn validate(&self) -> Result<()> {
        self.default_color.parse::<Rgb>()?;
        for (slug, color) in &self.list_colors {
            color.parse::<Rgb>().map_err(|_| {
                MorphmarkError::config(format!("Invalid color '{color}' for list '{slug}'"))
            })?;
        }
        if self.morphology_cache_capacity == 0 {
            return Err(MorphmarkError::config(
                "morphology_cache_capacity must be positive",
            ));
        }
        Ok(())
    }

    /// Set the DOCX marking style.
    pub fn style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the default color.
    pub fn default_color<S: Into<String>>(mut self, color: S) -> Self {
        self.default_color = color.into();
        self
    }

    /// Set the color for one predefined list.
    pub fn list_color<S: Into<String>>(mut self, slug: &str, color: S) -> Self {
        self.list_colors.insert(slug.to_string(), color.into());
        self
    }

    /// Set the matching strategy.
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn morphology_cache_capacity(mut self, capacity: u64) -> Self {
        self.morphology_cache_capacity = capacity;
        self
    }

    pub fn annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Color for a match with the given provenance.
    pub fn color_for(&self, provenance: Option<&Provenance>) -> Rgb {
        let configured = provenance
            .and_then(Provenance::list_slug)
            .and_then(|slug| self.list_colors.get(slug))
            .unwrap_or(&self.default_color);
        Rgb::from_hex_or_default(configured)
    }
}
