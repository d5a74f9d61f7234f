//! Document highlighting.
//!
//! Both pipelines search the whole document, count every match, and mark
//! the non-overlapping subset chosen by
//! [`resolve_overlaps`](crate::search::resolve_overlaps).

pub mod annotation;
pub mod color;
pub mod docx;
pub mod pdf;

pub use annotation::{
    AnnotationContent, AnnotationContentProvider, HighlightAnnotation, ListAnnotations,
    NoAnnotations,
};
pub use color::Rgb;
pub use docx::{DocxAnalyser, DocxPackage};
pub use pdf::{OxideDocument, PdfAnalyser, PdfDocument, RawDictDocument};
