//! Resolution of private-use glyphs.
//!
//! Some PDF fonts map glyphs to Private Use Area code points, which carry no
//! meaning as text. Such a glyph is rendered and recognized once per
//! `(font, code)` pair; the answer is cached and reused for every later
//! occurrence in any document.

use std::ops::RangeInclusive;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};
use parking_lot::RwLock;

use crate::highlight::pdf::document::PdfDocument;
use crate::highlight::pdf::glyph::Rect;

/// Code points treated as private-use glyphs.
pub const PUA_RANGE: RangeInclusive<u32> = 0xE000..=0xF8FF;

/// Language hint passed to the recognizer.
pub const OCR_LANGUAGE: &str = "rus";

pub fn is_pua(c: char) -> bool {
    PUA_RANGE.contains(&u32::from(c))
}

/// A rendered glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphImage {
    pub width: u32,
    pub height: u32,

    /// RGBA pixels, row-major from the top-left corner
    pub data: Vec<u8>,
}

/// Recognizes a single rendered character.
pub trait GlyphOcr: Send + Sync {
    fn recognize(&self, glyph: &GlyphImage, language_hint: &str) -> Option<char>;

    fn name(&self) -> &'static str;
}

/// A recognizer that never recognizes anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOcr;

impl GlyphOcr for NoOcr {
    fn recognize(&self, _glyph: &GlyphImage, _language_hint: &str) -> Option<char> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Shared `(font, code) -> char` cache.
///
/// Clones share the same cache. Failed recognitions are cached as the raw
/// glyph so they are not retried.
#[derive(Clone, Debug, Default)]
pub struct PuaMap {
    mapping: Arc<RwLock<AHashMap<(String, u32), char>>>,
}

impl PuaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, font: &str, glyph: char) -> Option<char> {
        self.mapping
            .read()
            .get(&(font.to_string(), u32::from(glyph)))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.mapping.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a glyph to real text.
    ///
    /// Ordinary characters are returned unchanged. A private-use glyph
    /// without a bounding box cannot be rendered and is returned as is.
    pub fn resolve(
        &self,
        glyph: char,
        bbox: Option<&Rect>,
        font: &str,
        page: usize,
        document: &dyn PdfDocument,
        ocr: &dyn GlyphOcr,
    ) -> char {
        if !is_pua(glyph) {
            return glyph;
        }
        if let Some(known) = self.get(font, glyph) {
            return known;
        }
        let Some(bbox) = bbox else {
            return glyph;
        };

        let recognized = match document.render_clip(page, bbox) {
            Ok(Some(image)) => ocr.recognize(&image, OCR_LANGUAGE),
            Ok(None) => None,
            Err(e) => {
                warn!("Cannot render glyph U+{:04X} on page {page}: {e}", u32::from(glyph));
                None
            }
        };

        let resolved = recognized.unwrap_or(glyph);
        debug!(
            "Glyph U+{:04X} of font '{font}' resolved to {resolved:?}",
            u32::from(glyph)
        );

        *self
            .mapping
            .write()
            .entry((font.to_string(), u32::from(glyph)))
            .or_insert(resolved)
    }
}
