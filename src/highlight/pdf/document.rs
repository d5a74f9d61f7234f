//! PDF backend seam and the raw-dict JSON backend.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MorphmarkError, Result};
use crate::highlight::annotation::HighlightAnnotation;
use crate::highlight::pdf::glyph::Rect;
use crate::highlight::pdf::pua::GlyphImage;

/// One glyph as extracted from the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawGlyph {
    /// Extracted character (possibly a private-use code)
    pub c: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Rect>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub chars: Vec<RawGlyph>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

/// A text block. Image blocks have no lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

/// Text structure of one page in reading order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

/// Access to a PDF document.
///
/// Backends only ever add annotations; page content is never rewritten.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Blocks, lines, spans and glyphs of a page.
    fn page_text(&self, page: usize) -> Result<RawPage>;

    /// Rasterize a clip of a page, or `None` if the backend cannot render.
    fn render_clip(&self, page: usize, clip: &Rect) -> Result<Option<GlyphImage>>;

    fn add_highlight(&mut self, annotation: HighlightAnnotation) -> Result<()>;

    fn save(&self, path: &Path) -> Result<()>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct RawDict {
    pages: Vec<RawPage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<HighlightAnnotation>,
}

/// Document backed by the raw-dict JSON layout of PDF text extractors:
///
/// ```json
/// {"pages": [{"blocks": [{"lines": [{"spans": [
///     {"font": "Arial", "chars": [{"c": "a", "bbox": [0, 0, 5, 10]}]}
/// ]}]}]}]}
/// ```
///
/// Highlights are collected in memory and saved next to the pages under
/// `"annotations"`, so a saved document can be reopened.
#[derive(Clone, Debug, Default)]
pub struct RawDictDocument {
    dict: RawDict,
}

impl RawDictDocument {
    pub fn new(pages: Vec<RawPage>) -> Self {
        RawDictDocument {
            dict: RawDict {
                pages,
                annotations: Vec::new(),
            },
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let dict: RawDict = serde_json::from_str(json)
            .map_err(|e| MorphmarkError::document(format!("Invalid raw-dict JSON: {e}")))?;
        Ok(RawDictDocument { dict })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let document = Self::from_json_str(&json)?;
        debug!(
            "Opened {} with {} pages",
            path.as_ref().display(),
            document.page_count()
        );
        Ok(document)
    }

    pub fn annotations(&self) -> &[HighlightAnnotation] {
        &self.dict.annotations
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.dict)?)
    }
}

impl PdfDocument for RawDictDocument {
    fn page_count(&self) -> usize {
        self.dict.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<RawPage> {
        self.dict
            .pages
            .get(page)
            .cloned()
            .ok_or_else(|| MorphmarkError::pdf(format!("Page {page} does not exist")))
    }

    fn render_clip(&self, _page: usize, _clip: &Rect) -> Result<Option<GlyphImage>> {
        Ok(None)
    }

    fn add_highlight(&mut self, annotation: HighlightAnnotation) -> Result<()> {
        if annotation.page >= self.page_count() {
            return Err(MorphmarkError::pdf(format!(
                "Cannot annotate page {}: document has {} pages",
                annotation.page,
                self.page_count()
            )));
        }
        self.dict.annotations.push(annotation);
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
