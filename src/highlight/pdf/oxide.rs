//! PDF files read and annotated through `pdf_oxide`.

use std::path::Path;

use log::debug;
use parking_lot::Mutex;
use pdf_oxide::annotation_types::{AnnotationSubtype, TextMarkupType};
use pdf_oxide::api::Pdf;
use pdf_oxide::layout::TextChar;
use pdf_oxide::writer::TextMarkupAnnotation;

use crate::error::{MorphmarkError, Result};
use crate::highlight::annotation::HighlightAnnotation;
use crate::highlight::pdf::document::{PdfDocument, RawBlock, RawGlyph, RawLine, RawPage, RawSpan};
use crate::highlight::pdf::glyph::Rect;
use crate::highlight::pdf::pua::GlyphImage;

/// Resolution used to rasterize glyphs for recognition.
#[cfg(feature = "render")]
const RENDER_DPI: u32 = 300;

/// Horizontal gap, as a fraction of the font size, read as a word break.
const WORD_GAP: f32 = 0.25;

fn pdf_error(error: pdf_oxide::Error) -> MorphmarkError {
    MorphmarkError::pdf(error.to_string())
}

/// A PDF file.
///
/// Text comes from the glyphs of the page content in PDF user space
/// (y grows upwards). Highlights are written as `/Highlight` markup
/// annotations; page content streams are left untouched.
pub struct OxideDocument {
    pdf: Mutex<Pdf>,
    page_count: usize,
}

impl OxideDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pdf = Pdf::open(path).map_err(|e| {
            MorphmarkError::document(format!("Cannot open {}: {e}", path.display()))
        })?;
        let document = Self::from_pdf(pdf)?;
        debug!("Opened {} with {} pages", path.display(), document.page_count);
        Ok(document)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let pdf = Pdf::from_bytes(bytes)
            .map_err(|e| MorphmarkError::document(format!("Invalid PDF: {e}")))?;
        Self::from_pdf(pdf)
    }

    fn from_pdf(mut pdf: Pdf) -> Result<Self> {
        let page_count = pdf
            .page_count()
            .map_err(|e| MorphmarkError::document(format!("Cannot read page tree: {e}")))?;
        Ok(OxideDocument {
            pdf: Mutex::new(pdf),
            page_count,
        })
    }

    /// Rectangles of the highlight annotations on `page`.
    pub fn highlights(&self, page: usize) -> Result<Vec<Rect>> {
        let page = self.pdf.lock().page(page).map_err(pdf_error)?;
        Ok(page
            .annotations()
            .iter()
            .filter(|a| a.subtype() == AnnotationSubtype::Highlight)
            .map(|a| {
                let r = a.rect();
                Rect::new(
                    f64::from(r.x),
                    f64::from(r.y),
                    f64::from(r.x + r.width),
                    f64::from(r.y + r.height),
                )
            })
            .collect())
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page >= self.page_count {
            return Err(MorphmarkError::pdf(format!(
                "Page {page} does not exist: document has {} pages",
                self.page_count
            )));
        }
        Ok(())
    }
}

/// Box of a glyph from its baseline, extended down to the descent and up to
/// the ascent of the font.
fn glyph_rect(ch: &TextChar) -> Rect {
    let bottom = ch.bbox.y.min(ch.origin_y + ch.descent);
    let top = (ch.bbox.y + ch.bbox.height).max(ch.origin_y + ch.ascent);
    Rect::new(
        f64::from(ch.bbox.x),
        f64::from(bottom),
        f64::from(ch.bbox.x + ch.bbox.width),
        f64::from(top),
    )
}

/// Group glyphs in content order into lines and same-font spans.
///
/// A line ends when the baseline moves by more than half the font size or
/// the pen jumps back to the left. A visible gap between two glyphs that is
/// not already a space becomes a space without a box.
fn layout_page(chars: &[TextChar]) -> RawPage {
    let mut lines: Vec<RawLine> = Vec::new();
    let mut previous: Option<&TextChar> = None;

    for ch in chars {
        let size = ch.font_size.max(1.0);
        let new_line = previous.is_none_or(|p| {
            (ch.origin_y - p.origin_y).abs() > size * 0.5 || ch.bbox.x + size < p.bbox.x
        });
        if new_line {
            lines.push(RawLine::default());
        }
        let Some(line) = lines.last_mut() else {
            continue;
        };

        if let Some(p) = previous.filter(|_| !new_line) {
            let gap = ch.bbox.x - (p.bbox.x + p.bbox.width);
            if gap > size * WORD_GAP && !p.char.is_whitespace() && !ch.char.is_whitespace() {
                let space = RawGlyph {
                    c: " ".to_string(),
                    bbox: None,
                };
                push_glyph(line, &ch.font_name, space);
            }
        }

        let glyph = RawGlyph {
            c: ch.char.to_string(),
            bbox: Some(glyph_rect(ch)),
        };
        push_glyph(line, &ch.font_name, glyph);
        previous = Some(ch);
    }

    RawPage {
        blocks: vec![RawBlock { lines }],
    }
}

fn push_glyph(line: &mut RawLine, font: &str, glyph: RawGlyph) {
    match line.spans.last_mut() {
        Some(span) if span.font == font => span.chars.push(glyph),
        _ => line.spans.push(RawSpan {
            font: font.to_string(),
            chars: vec![glyph],
        }),
    }
}

impl PdfDocument for OxideDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, page: usize) -> Result<RawPage> {
        self.check_page(page)?;
        let chars = self.pdf.lock().extract_chars(page).map_err(pdf_error)?;
        Ok(layout_page(&chars))
    }

    #[cfg(feature = "render")]
    fn render_clip(&self, page: usize, clip: &Rect) -> Result<Option<GlyphImage>> {
        use pdf_oxide::api::{ImageFormat, RenderOptions};

        self.check_page(page)?;
        let mut pdf = self.pdf.lock();
        let [llx, _, _, ury] = pdf.page_media_box(page).map_err(pdf_error)?;
        let mut options = RenderOptions::with_dpi(RENDER_DPI);
        options.format = ImageFormat::RawRgba8;
        let image = pdf
            .render_page_with_options(page, &options)
            .map_err(pdf_error)?;

        // Page space is y-up, pixel rows run from the top.
        let scale = f64::from(RENDER_DPI) / 72.0;
        let (llx, ury) = (f64::from(llx), f64::from(ury));
        let left = ((clip.x0 - llx) * scale).floor().max(0.0) as u32;
        let top = ((ury - clip.y1) * scale).floor().max(0.0) as u32;
        let right = (((clip.x1 - llx) * scale).ceil().max(0.0) as u32).min(image.width);
        let bottom = (((ury - clip.y0) * scale).ceil().max(0.0) as u32).min(image.height);
        if left >= right || top >= bottom {
            return Ok(None);
        }

        let (width, height) = (right - left, bottom - top);
        let stride = image.width as usize * 4;
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for row in top as usize..bottom as usize {
            let start = row * stride + left as usize * 4;
            data.extend_from_slice(&image.data[start..start + width as usize * 4]);
        }
        Ok(Some(GlyphImage {
            width,
            height,
            data,
        }))
    }

    #[cfg(not(feature = "render"))]
    fn render_clip(&self, _page: usize, _clip: &Rect) -> Result<Option<GlyphImage>> {
        Ok(None)
    }

    fn add_highlight(&mut self, annotation: HighlightAnnotation) -> Result<()> {
        self.check_page(annotation.page)?;
        let r = annotation.rect;
        let [red, green, blue] = annotation.color;
        let mut markup = TextMarkupAnnotation::from_rect(
            TextMarkupType::Highlight,
            pdf_oxide::geometry::Rect::from_points(
                r.x0 as f32,
                r.y0 as f32,
                r.x1 as f32,
                r.y1 as f32,
            ),
        )
        .with_color(red, green, blue);
        if let Some(content) = annotation.content {
            markup = markup.with_subject(content.title).with_contents(content.body);
        }

        let pdf = self.pdf.get_mut();
        let mut page = pdf.page(annotation.page).map_err(pdf_error)?;
        page.add_annotation(markup);
        pdf.save_page(page).map_err(pdf_error)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.pdf.lock().save(path).map_err(pdf_error)
    }
}
