//! Run splitting and highlight injection on paragraph trees.
//!
//! A paragraph's runs are grouped into batches: consecutive `w:r` siblings
//! form one batch, and runs inside an inline container such as
//! `w:hyperlink` form batches of their own. Each batch is searched as one
//! string, and matched character ranges are isolated into their own runs
//! which then receive the highlight property.
//!
//! Run text model:
//!
//! | child              | text  |
//! |--------------------|-------|
//! | `w:t`              | its text |
//! | `w:tab`            | `\t`  |
//! | `w:br`, `w:cr`     | `\n`  |
//! | `w:noBreakHyphen`  | `-`   |
//!
//! Other children contribute nothing. When a run is split, `w:rPr` is copied
//! into every piece, content children are distributed by position (a `w:t`
//! straddling a cut is split), and any other child stays with the piece at
//! its position.

use crate::error::{MorphmarkError, Result};
use crate::highlight::docx::xml::{NodeId, XmlTree};

pub const PARAGRAPH: &str = "w:p";
pub const RUN: &str = "w:r";
pub const RUN_PROPERTIES: &str = "w:rPr";
pub const TEXT: &str = "w:t";
pub const TABLE: &str = "w:tbl";
pub const TABLE_ROW: &str = "w:tr";
pub const TABLE_CELL: &str = "w:tc";

/// Inline elements whose runs are searched as separate batches.
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:smartTag",
    "w:ins",
    "w:customXml",
    "w:fldSimple",
];

/// Schema order of `w:rPr` children, used to place injected properties.
const RUN_PROPERTY_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
    "w:rPrChange",
];

/// The property that marks a highlighted run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunHighlight {
    /// `<w:highlight w:val="name"/>`
    Named(&'static str),
    /// `<w:shd w:val="clear" w:color="auto" w:fill="RRGGBB"/>`
    Fill(String),
}

/// Paragraphs in processing order: body paragraphs first, then tables in
/// document order, row by row and cell by cell.
pub fn document_paragraphs(tree: &XmlTree, body: NodeId) -> Vec<NodeId> {
    let mut paragraphs = Vec::new();
    collect_paragraphs(tree, body, &mut paragraphs);
    paragraphs
}

fn collect_paragraphs(tree: &XmlTree, container: NodeId, out: &mut Vec<NodeId>) {
    out.extend(tree.children_named(container, PARAGRAPH));
    for table in tree.children_named(container, TABLE) {
        for row in tree.children_named(table, TABLE_ROW) {
            for cell in tree.children_named(row, TABLE_CELL) {
                collect_paragraphs(tree, cell, out);
            }
        }
    }
}

/// Split a paragraph into run batches.
pub fn paragraph_batches(tree: &XmlTree, paragraph: NodeId) -> Vec<Vec<NodeId>> {
    let mut batches = Vec::new();
    collect_batches(tree, paragraph, &mut batches);
    batches
}

fn collect_batches(tree: &XmlTree, parent: NodeId, batches: &mut Vec<Vec<NodeId>>) {
    let mut current = Vec::new();
    for &child in tree.children(parent) {
        if tree.is_named(child, RUN) {
            current.push(child);
            continue;
        }
        if !tree.is_element(child) {
            continue;
        }
        if !current.is_empty() {
            batches.push(std::mem::take(&mut current));
        }
        if RUN_CONTAINERS.iter().any(|name| tree.is_named(child, name)) {
            collect_batches(tree, child, batches);
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
}

/// Text a content child contributes to its run.
fn content_text(tree: &XmlTree, child: NodeId) -> Option<String> {
    match tree.name(child)? {
        TEXT => Some(tree.inner_text(child)),
        "w:tab" => Some("\t".to_string()),
        "w:br" | "w:cr" => Some("\n".to_string()),
        "w:noBreakHyphen" => Some("-".to_string()),
        _ => None,
    }
}

pub fn run_text(tree: &XmlTree, run: NodeId) -> String {
    tree.children(run)
        .iter()
        .filter_map(|&child| content_text(tree, child))
        .collect()
}

pub fn batch_text(tree: &XmlTree, runs: &[NodeId]) -> String {
    runs.iter().map(|&run| run_text(tree, run)).collect()
}

/// Text of all batches of a paragraph, in document order.
pub fn paragraph_text(tree: &XmlTree, paragraph: NodeId) -> String {
    paragraph_batches(tree, paragraph)
        .iter()
        .map(|batch| batch_text(tree, batch))
        .collect()
}

/// Mutable view of one batch.
pub struct BatchMutator<'a> {
    tree: &'a mut XmlTree,
    runs: Vec<NodeId>,
}

impl<'a> BatchMutator<'a> {
    pub fn new(tree: &'a mut XmlTree, runs: Vec<NodeId>) -> Self {
        BatchMutator { tree, runs }
    }

    pub fn runs(&self) -> &[NodeId] {
        &self.runs
    }

    pub fn text(&self) -> String {
        batch_text(&*self.tree, &self.runs)
    }

    /// Character range of every run, recomputed from the current tree.
    fn run_ranges(&self) -> Vec<(usize, usize)> {
        let mut offset = 0;
        self.runs
            .iter()
            .map(|&run| {
                let len = run_text(&*self.tree, run).chars().count();
                let range = (offset, offset + len);
                offset += len;
                range
            })
            .collect()
    }

    /// Split runs so that the character range `start..end` is covered by
    /// whole runs, and return those runs.
    pub fn isolate(&mut self, start: usize, end: usize) -> Result<Vec<NodeId>> {
        let ranges = self.run_ranges();
        let total = ranges.last().map_or(0, |r| r.1);
        if start >= end || end > total {
            return Err(MorphmarkError::document(format!(
                "Range {start}..{end} is outside the batch text (length {total})"
            )));
        }

        let mut isolated = Vec::new();
        let mut runs = Vec::with_capacity(self.runs.len() + 2);

        for (&run, &(run_start, run_end)) in self.runs.iter().zip(&ranges) {
            if run_start == run_end || run_end <= start || run_start >= end {
                runs.push(run);
                continue;
            }

            let cuts: Vec<usize> = [start, end]
                .into_iter()
                .filter(|&cut| cut > run_start && cut < run_end)
                .map(|cut| cut - run_start)
                .collect();
            let pieces = split_run(&mut *self.tree, run, &cuts)?;

            let mut piece_start = run_start;
            for piece in pieces {
                let piece_end = piece_start + run_text(&*self.tree, piece).chars().count();
                if piece_start >= start && piece_end <= end {
                    isolated.push(piece);
                }
                runs.push(piece);
                piece_start = piece_end;
            }
        }

        self.runs = runs;
        Ok(isolated)
    }

    /// Isolate `start..end` and mark every run covering it.
    pub fn highlight(&mut self, start: usize, end: usize, mark: &RunHighlight) -> Result<()> {
        for run in self.isolate(start, end)? {
            apply_highlight(&mut *self.tree, run, mark);
        }
        Ok(())
    }
}

/// Split `run` at the given local character offsets (ascending, strictly
/// inside the run). The original node becomes the first piece; the others
/// are inserted after it. Returns all pieces in order.
pub fn split_run(tree: &mut XmlTree, run: NodeId, cuts: &[usize]) -> Result<Vec<NodeId>> {
    if cuts.is_empty() {
        return Ok(vec![run]);
    }

    let len = run_text(tree, run).chars().count();
    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(cuts);
    bounds.push(len);
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MorphmarkError::document(format!(
            "Invalid split points {cuts:?} for a run of length {len}"
        )));
    }
    let segments: Vec<(usize, usize)> = bounds.windows(2).map(|w| (w[0], w[1])).collect();
    let segment_at = |pos: usize| {
        segments
            .iter()
            .position(|&(s, e)| pos >= s && pos < e)
            .unwrap_or(segments.len() - 1)
    };

    let mut pieces = vec![run];
    for _ in 1..segments.len() {
        pieces.push(tree.shallow_clone(run));
    }

    let mut pos = 0;
    for child in tree.children(run).to_vec() {
        if tree.is_named(child, RUN_PROPERTIES) {
            for &piece in &pieces[1..] {
                let copy = tree.deep_clone(child);
                tree.append_child(piece, copy);
            }
            continue;
        }

        if tree.is_named(child, TEXT) {
            let text = tree.inner_text(child);
            let chars: Vec<char> = text.chars().collect();
            let (text_start, text_end) = (pos, pos + chars.len());

            let parts: Vec<(usize, String)> = segments
                .iter()
                .enumerate()
                .filter_map(|(index, &(s, e))| {
                    let lo = text_start.max(s);
                    let hi = text_end.min(e);
                    (lo < hi).then(|| {
                        (index, chars[lo - text_start..hi - text_start].iter().collect())
                    })
                })
                .collect();

            if parts.len() <= 1 {
                let index = parts.first().map_or_else(|| segment_at(pos), |p| p.0);
                if index != 0 {
                    tree.append_child(pieces[index], child);
                }
            } else {
                for (i, (index, part)) in parts.into_iter().enumerate() {
                    // The original node carries the first part, wherever it lands.
                    let node = if i == 0 {
                        if index != 0 {
                            tree.append_child(pieces[index], child);
                        }
                        child
                    } else {
                        let node = tree.shallow_clone(child);
                        tree.append_child(pieces[index], node);
                        node
                    };
                    tree.set_inner_text(node, &part);
                    tree.set_attr(node, "xml:space", "preserve");
                }
            }

            pos = text_end;
            continue;
        }

        let index = segment_at(pos);
        if index != 0 {
            tree.append_child(pieces[index], child);
        }
        if let Some(text) = content_text(tree, child) {
            pos += text.chars().count();
        }
    }

    let mut previous = run;
    for &piece in &pieces[1..] {
        tree.insert_after(previous, piece)?;
        previous = piece;
    }

    Ok(pieces)
}

/// Replace any highlight or shading of `run` with `mark`.
pub fn apply_highlight(tree: &mut XmlTree, run: NodeId, mark: &RunHighlight) {
    let properties = match tree.first_child_named(run, RUN_PROPERTIES) {
        Some(properties) => properties,
        None => {
            let properties = tree.new_element(RUN_PROPERTIES);
            tree.insert_child(run, 0, properties);
            properties
        }
    };

    let existing: Vec<NodeId> = tree
        .children(properties)
        .iter()
        .copied()
        .filter(|&c| tree.is_named(c, "w:highlight") || tree.is_named(c, "w:shd"))
        .collect();
    for node in existing {
        tree.detach(node);
    }

    let (name, element) = match mark {
        RunHighlight::Named(color) => {
            let element = tree.new_element("w:highlight");
            tree.set_attr(element, "w:val", color);
            ("w:highlight", element)
        }
        RunHighlight::Fill(fill) => {
            let element = tree.new_element("w:shd");
            tree.set_attr(element, "w:val", "clear");
            tree.set_attr(element, "w:color", "auto");
            tree.set_attr(element, "w:fill", fill);
            ("w:shd", element)
        }
    };

    let rank = |n: &str| RUN_PROPERTY_ORDER.iter().position(|o| *o == n);
    let own_rank = rank(name);
    let index = tree
        .children(properties)
        .iter()
        .position(|&child| match (tree.name(child).and_then(rank), own_rank) {
            (Some(other), Some(own)) => other > own,
            _ => false,
        })
        .unwrap_or(tree.children(properties).len());
    tree.insert_child(properties, index, element);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_paragraph(inner: &str) -> (XmlTree, NodeId) {
        let tree = XmlTree::parse(&format!("<w:p>{inner}</w:p>")).unwrap();
        let paragraph = tree.root_element().unwrap();
        (tree, paragraph)
    }

    #[test]
    fn test_batches_split_at_hyperlinks() {
        let (tree, paragraph) = parse_paragraph(
            "<w:pPr/><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r>\
             <w:hyperlink><w:r><w:t>c</w:t></w:r></w:hyperlink>\
             <w:r><w:t>d</w:t></w:r>",
        );

        let batches = paragraph_batches(&tree, paragraph);
        let texts: Vec<_> = batches.iter().map(|b| batch_text(&tree, b)).collect();
        assert_eq!(texts, vec!["ab", "c", "d"]);
        assert_eq!(paragraph_text(&tree, paragraph), "abcd");
    }

    #[test]
    fn test_run_text_model() {
        let (tree, paragraph) = parse_paragraph(
            "<w:r><w:rPr><w:b/></w:rPr><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/>\
             <w:noBreakHyphen/><w:instrText>X</w:instrText></w:r>",
        );
        let run = tree.children(paragraph)[0];
        assert_eq!(run_text(&tree, run), "a\tb\n-");
    }

    #[test]
    fn test_split_run_three_ways() {
        let (mut tree, paragraph) =
            parse_paragraph(r#"<w:r><w:rPr><w:b/></w:rPr><w:t>hello world</w:t></w:r>"#);
        let run = tree.children(paragraph)[0];

        let pieces = split_run(&mut tree, run, &[2, 5]).unwrap();
        assert_eq!(pieces.len(), 3);
        let texts: Vec<_> = pieces.iter().map(|&p| run_text(&tree, p)).collect();
        assert_eq!(texts, vec!["he", "llo", " world"]);

        assert_eq!(
            tree.to_xml().unwrap(),
            "<w:p>\
             <w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">he</w:t></w:r>\
             <w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">llo</w:t></w:r>\
             <w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\"> world</w:t></w:r>\
             </w:p>"
        );
    }

    #[test]
    fn test_split_distributes_content_children() {
        let (mut tree, paragraph) =
            parse_paragraph("<w:r><w:t>ab</w:t><w:tab/><w:t>cd</w:t></w:r>");
        let run = tree.children(paragraph)[0];

        let pieces = split_run(&mut tree, run, &[3]).unwrap();
        assert_eq!(run_text(&tree, pieces[0]), "ab\t");
        assert_eq!(run_text(&tree, pieces[1]), "cd");
        assert_eq!(paragraph_text(&tree, paragraph), "ab\tcd");
    }

    #[test]
    fn test_highlight_across_runs() {
        let (mut tree, paragraph) = parse_paragraph(
            "<w:r><w:t>The qu</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>ick Fox</w:t></w:r>",
        );
        let runs = paragraph_batches(&tree, paragraph).remove(0);

        let mut batch = BatchMutator::new(&mut tree, runs);
        batch.highlight(4, 13, &RunHighlight::Named("green")).unwrap();
        assert_eq!(batch.runs().len(), 3);
        assert_eq!(batch.text(), "The quick Fox");

        let xml = tree.to_xml().unwrap();
        assert_eq!(
            xml,
            "<w:p>\
             <w:r><w:t xml:space=\"preserve\">The </w:t></w:r>\
             <w:r><w:rPr><w:highlight w:val=\"green\"/></w:rPr><w:t xml:space=\"preserve\">qu</w:t></w:r>\
             <w:r><w:rPr><w:i/><w:highlight w:val=\"green\"/></w:rPr><w:t>ick Fox</w:t></w:r>\
             </w:p>"
        );
    }

    #[test]
    fn test_highlight_across_text_nodes_of_one_run() {
        let (mut tree, paragraph) =
            parse_paragraph("<w:r><w:t>Мой кот</w:t><w:br/><w:t>спит тихо</w:t></w:r>");
        let runs = paragraph_batches(&tree, paragraph).remove(0);

        let mut batch = BatchMutator::new(&mut tree, runs);
        batch.highlight(4, 12, &RunHighlight::Named("green")).unwrap();
        assert_eq!(batch.text(), "Мой кот\nспит тихо");

        let pieces = batch.runs().to_vec();
        let texts: Vec<_> = pieces.iter().map(|&r| run_text(&tree, r)).collect();
        assert_eq!(texts, vec!["Мой ", "кот\nспит", " тихо"]);
        assert_eq!(paragraph_text(&tree, paragraph), "Мой кот\nспит тихо");
    }

    #[test]
    fn test_split_moves_text_node_without_leading_part() {
        let (mut tree, paragraph) = parse_paragraph("<w:r><w:t>ab</w:t><w:t>cdef</w:t></w:r>");
        let run = tree.children(paragraph)[0];

        let pieces = split_run(&mut tree, run, &[1, 4]).unwrap();
        let texts: Vec<_> = pieces.iter().map(|&p| run_text(&tree, p)).collect();
        assert_eq!(texts, vec!["a", "bcd", "ef"]);
        assert_eq!(paragraph_text(&tree, paragraph), "abcdef");
    }

    #[test]
    fn test_highlight_precedes_tracked_property_change() {
        let (mut tree, paragraph) = parse_paragraph(
            r#"<w:r><w:rPr><w:b/><w:rPrChange w:id="1" w:author="A"><w:rPr/></w:rPrChange></w:rPr><w:t>x</w:t></w:r>"#,
        );
        let run = tree.children(paragraph)[0];

        apply_highlight(&mut tree, run, &RunHighlight::Named("green"));
        assert_eq!(
            tree.to_xml().unwrap(),
            r#"<w:p><w:r><w:rPr><w:b/><w:highlight w:val="green"/><w:rPrChange w:id="1" w:author="A"><w:rPr/></w:rPrChange></w:rPr><w:t>x</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_adjacent_ranges_use_updated_offsets() {
        let (mut tree, paragraph) = parse_paragraph("<w:r><w:t>abcdef</w:t></w:r>");
        let runs = paragraph_batches(&tree, paragraph).remove(0);

        let mut batch = BatchMutator::new(&mut tree, runs);
        batch.highlight(0, 2, &RunHighlight::Named("green")).unwrap();
        batch.highlight(2, 4, &RunHighlight::Named("red")).unwrap();
        batch.highlight(2, 4, &RunHighlight::Named("yellow")).unwrap();

        assert_eq!(batch.runs().len(), 3);
        assert_eq!(batch.text(), "abcdef");
        let xml = tree.to_xml().unwrap();
        assert!(xml.contains("w:val=\"yellow\""));
        assert!(!xml.contains("w:val=\"red\""));
    }

    #[test]
    fn test_shading_replaces_existing() {
        let (mut tree, paragraph) = parse_paragraph(
            r#"<w:r><w:rPr><w:b/><w:shd w:val="clear" w:fill="FF0000"/><w:lang w:val="ru-RU"/></w:rPr><w:t>x</w:t></w:r>"#,
        );
        let run = tree.children(paragraph)[0];

        apply_highlight(&mut tree, run, &RunHighlight::Fill("00FF00".to_string()));
        assert_eq!(
            tree.to_xml().unwrap(),
            r#"<w:p><w:r><w:rPr><w:b/><w:shd w:val="clear" w:color="auto" w:fill="00FF00"/><w:lang w:val="ru-RU"/></w:rPr><w:t>x</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_range_outside_batch() {
        let (mut tree, paragraph) = parse_paragraph("<w:r><w:t>ab</w:t></w:r>");
        let runs = paragraph_batches(&tree, paragraph).remove(0);
        let mut batch = BatchMutator::new(&mut tree, runs);
        assert!(batch.isolate(1, 5).is_err());
    }

    #[test]
    fn test_table_order() {
        let tree = XmlTree::parse(
            "<w:body><w:tbl><w:tr><w:tc><w:p><w:r><w:t>c1</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>c2</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>p1</w:t></w:r></w:p></w:body>",
        )
        .unwrap();
        let body = tree.root_element().unwrap();

        let texts: Vec<_> = document_paragraphs(&tree, body)
            .into_iter()
            .map(|p| paragraph_text(&tree, p))
            .collect();
        assert_eq!(texts, vec!["p1", "c1", "c2"]);
    }
}
