//! PDF highlighting through highlight annotations.
//!
//! Page text is rebuilt glyph by glyph from a [`PdfDocument`] backend, so
//! that every character of the searched text keeps its bounding box.

pub mod analyser;
pub mod collector;
pub mod document;
pub mod glyph;
pub mod oxide;
pub mod pua;

pub use analyser::{DocumentText, PdfAnalyser};
pub use collector::{PageCollector, PageText};
pub use document::{PdfDocument, RawDictDocument, RawPage};
pub use glyph::{Char, Rect};
pub use oxide::OxideDocument;
pub use pua::{GlyphImage, GlyphOcr, NoOcr, PuaMap};
