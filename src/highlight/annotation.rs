//! Highlight annotations and their descriptive content.

use serde::{Deserialize, Serialize};

use crate::highlight::pdf::glyph::Rect;
use crate::search::matches::{Match, MatchTarget};
use crate::search::phrase::{PredefinedList, Provenance};

/// Title used for annotations produced by regex patterns.
pub const PATTERN_TITLE: &str = "Шаблон";

/// Popup text attached to a highlight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationContent {
    pub title: String,
    pub body: String,
}

impl AnnotationContent {
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        AnnotationContent {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A highlight placed on one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightAnnotation {
    /// 0-based page index
    pub page: usize,
    pub rect: Rect,

    /// RGB components in `0.0..=1.0`
    pub color: [f32; 3],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<AnnotationContent>,
}

/// Supplies annotation text for a match.
pub trait AnnotationContentProvider: Send + Sync {
    /// `None` when the match gets a bare highlight.
    fn describe(&self, found: &Match) -> Option<AnnotationContent>;

    fn name(&self) -> &'static str;
}

/// Describes matches from predefined lists by the list title and the term,
/// and pattern matches by the pattern name.
///
/// Foreign-agent entries only carry the title here, since their register
/// details live outside this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListAnnotations;

impl AnnotationContentProvider for ListAnnotations {
    fn describe(&self, found: &Match) -> Option<AnnotationContent> {
        match &found.target {
            MatchTarget::Term(phrase) => match phrase.provenance {
                Provenance::Predefined(
                    list @ (PredefinedList::ForeignAgentsPersons
                    | PredefinedList::ForeignAgentsCompanies),
                ) => Some(AnnotationContent::new(list.title(), "")),
                Provenance::Predefined(list) => Some(AnnotationContent::new(
                    list.title(),
                    phrase.original_text.as_str(),
                )),
                _ => None,
            },
            MatchTarget::Pattern(pattern) => Some(AnnotationContent::new(
                PATTERN_TITLE,
                format!("«{}»", pattern.name()),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "list"
    }
}

/// Never attaches content.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnnotations;

impl AnnotationContentProvider for NoAnnotations {
    fn describe(&self, _found: &Match) -> Option<AnnotationContent> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
