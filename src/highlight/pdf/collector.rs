//! Building normalized page text from raw glyphs.

use crate::error::Result;
use crate::highlight::pdf::document::{PdfDocument, RawLine};
use crate::highlight::pdf::glyph::{Char, Rect, bounding_rect};
use crate::highlight::pdf::pua::{GlyphOcr, PuaMap};

/// Glyphs that mark a word wrapped at the end of a line.
const HYPHENS: [char; 2] = ['-', '\u{00AD}'];

/// Normalized text of one page.
///
/// Every char of [`text`](Self::text) has one entry in `chars`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageText {
    pub chars: Vec<Char>,

    /// Indices of chars after which a hyphenated word continues on the
    /// next line, ascending
    pub wraps: Vec<usize>,
}

impl PageText {
    pub fn text(&self) -> String {
        self.chars.iter().map(|ch| ch.c).collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Split `start..end` into pieces that do not cross a wrap point.
    pub fn split_at_wraps(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut pieces = Vec::new();
        let mut piece_start = start;
        for &wrap in &self.wraps {
            if wrap >= piece_start && wrap + 1 < end {
                pieces.push((piece_start, wrap + 1));
                piece_start = wrap + 1;
            }
        }
        if piece_start < end {
            pieces.push((piece_start, end));
        }
        pieces
    }

    /// Bounding box of `start..end`.
    pub fn rect(&self, start: usize, end: usize) -> Option<Rect> {
        let end = end.min(self.chars.len());
        if start >= end {
            return None;
        }
        bounding_rect(&self.chars[start..end])
    }
}

/// Walks a page's blocks, lines and spans, resolving private-use glyphs.
pub struct PageCollector<'a> {
    pua: &'a PuaMap,
    ocr: &'a dyn GlyphOcr,
}

impl<'a> PageCollector<'a> {
    pub fn new(pua: &'a PuaMap, ocr: &'a dyn GlyphOcr) -> Self {
        PageCollector { pua, ocr }
    }

    /// Collect the text of `page`.
    ///
    /// Lines and blocks are separated by one space unless the text already
    /// ends with whitespace. A hyphen that ends a line right after a letter
    /// or digit is dropped and recorded as a wrap point instead, and the
    /// following line is joined without a space.
    pub fn collect(&self, document: &dyn PdfDocument, page: usize) -> Result<PageText> {
        let raw = document.page_text(page)?;
        let mut out = PageText::default();
        let mut joined = false;

        for line in raw.blocks.iter().flat_map(|block| &block.lines) {
            let mut chars = self.line_chars(document, page, line);
            if chars.is_empty() {
                continue;
            }

            let wrapped = Self::ends_with_wrap(&chars);
            if wrapped {
                chars.pop();
            }

            let needs_separator = !joined
                && out
                    .chars
                    .last()
                    .is_some_and(|last| !last.c.is_whitespace());
            if needs_separator {
                out.chars.push(Char::separator());
            }

            out.chars.extend(chars);
            joined = wrapped;
            if wrapped {
                out.wraps.push(out.chars.len() - 1);
            }
        }

        Ok(out)
    }

    fn line_chars(&self, document: &dyn PdfDocument, page: usize, line: &RawLine) -> Vec<Char> {
        let mut chars = Vec::new();
        for span in &line.spans {
            for glyph in &span.chars {
                let Some(c) = glyph.c.chars().next() else {
                    continue;
                };
                let c = self
                    .pua
                    .resolve(c, glyph.bbox.as_ref(), &span.font, page, document, self.ocr);
                chars.push(Char::new(c, glyph.bbox));
            }
        }
        chars
    }

    fn ends_with_wrap(chars: &[Char]) -> bool {
        match chars {
            [.., before, last] => HYPHENS.contains(&last.c) && before.c.is_alphanumeric(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::pdf::document::RawDictDocument;
    use crate::highlight::pdf::pua::NoOcr;

    /// Raw-dict JSON with one block per entry of `blocks`, one line per
    /// string, one glyph per char laid out left to right.
    fn document(blocks: &[&[&str]]) -> RawDictDocument {
        let blocks: Vec<_> = blocks
            .iter()
            .enumerate()
            .map(|(b, lines)| {
                let lines: Vec<_> = lines
                    .iter()
                    .enumerate()
                    .map(|(l, text)| {
                        let y = (b * 100 + l * 10) as f64;
                        let chars: Vec<_> = text
                            .chars()
                            .enumerate()
                            .map(|(i, c)| {
                                let x = i as f64 * 5.0;
                                serde_json::json!({"c": c.to_string(), "bbox": [x, y, x + 5.0, y + 8.0]})
                            })
                            .collect();
                        serde_json::json!({"spans": [{"font": "F", "chars": chars}]})
                    })
                    .collect();
                serde_json::json!({ "lines": lines })
            })
            .collect();
        let json = serde_json::json!({"pages": [{"blocks": blocks}]});
        RawDictDocument::from_json_str(&json.to_string()).unwrap()
    }

    fn collect(document: &RawDictDocument) -> PageText {
        let pua = PuaMap::new();
        PageCollector::new(&pua, &NoOcr).collect(document, 0).unwrap()
    }

    #[test]
    fn test_lines_and_blocks_separated() {
        let page = collect(&document(&[&["first line", "second "], &["block"]]));
        assert_eq!(page.text(), "first line second block");
        assert!(page.wraps.is_empty());
        assert_eq!(page.chars[10].bbox, None);
    }

    #[test]
    fn test_hyphen_wrap() {
        let page = collect(&document(&[&["ино-", "агент и\u{00AD}", "ещё"]]));
        assert_eq!(page.text(), "иноагент иещё");
        assert_eq!(page.wraps, vec![2, 9]);
    }

    #[test]
    fn test_standalone_dash_kept() {
        let page = collect(&document(&[&["one -", "two"]]));
        assert_eq!(page.text(), "one - two");
        assert!(page.wraps.is_empty());
    }

    #[test]
    fn test_split_at_wraps_and_rect() {
        let page = collect(&document(&[&["ино-", "агент"]]));
        assert_eq!(page.split_at_wraps(0, 8), vec![(0, 3), (3, 8)]);
        assert_eq!(page.split_at_wraps(3, 8), vec![(3, 8)]);
        assert_eq!(page.split_at_wraps(0, 3), vec![(0, 3)]);

        assert_eq!(page.rect(0, 3), Some(Rect::new(0.0, 0.0, 15.0, 8.0)));
        assert_eq!(page.rect(3, 8), Some(Rect::new(0.0, 10.0, 25.0, 18.0)));
        assert_eq!(page.rect(5, 5), None);
    }
}
