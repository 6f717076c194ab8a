//! Run-length text extraction.
//!
//! Flattens a segment's structural elements into one string and records, for
//! every text run, where it sits in the flat string and in document index
//! space. Flat offsets stay contiguous; document indices keep whatever gaps
//! tables, images and breaks leave between runs.

use serde::Serialize;
use tracing::{debug, trace};

use crate::document::{ParagraphElement, StructuralElement};
use crate::error::{IndexError, Result};
use crate::units::{byte_offset, utf16_len};

/// Half-open range in flat-text UTF-16 offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FlatRange {
    pub start: usize,
    pub end: usize,
}

/// Half-open range in document index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DocRange {
    pub start: usize,
    pub end: usize,
}

impl FlatRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl DocRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One contiguous span of extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub flat_start: usize,
    pub flat_end: usize,
    pub doc_start: usize,
    pub doc_end: usize,
}

impl TextRun {
    pub fn flat(&self) -> FlatRange {
        FlatRange::new(self.flat_start, self.flat_end)
    }

    pub fn doc(&self) -> DocRange {
        DocRange::new(self.doc_start, self.doc_end)
    }
}

/// Extracted text plus its run table. Built per request and never mutated.
#[derive(Debug, Clone, Default)]
pub struct FlatDocument {
    text: String,
    runs: Vec<TextRun>,
}

impl FlatDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Flat length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.runs.last().map_or(0, |r| r.flat_end)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The text covered by `range`
    pub fn slice(&self, range: FlatRange) -> Result<&str> {
        let len = self.len();
        let start = byte_offset(&self.text, range.start)
            .ok_or(IndexError::OutOfRange { offset: range.start, len })?;
        let end = byte_offset(&self.text, range.end)
            .ok_or(IndexError::OutOfRange { offset: range.end, len })?;
        if start > end {
            return Err(IndexError::OutOfRange { offset: range.start, len });
        }
        Ok(&self.text[start..end])
    }

    /// Up to `radius` characters either side of `range`, with the match itself
    /// included. Line breaks are flattened to spaces.
    pub fn context(&self, range: FlatRange, radius: usize) -> Result<String> {
        let len = self.len();
        let start = byte_offset(&self.text, range.start)
            .ok_or(IndexError::OutOfRange { offset: range.start, len })?;
        let end = byte_offset(&self.text, range.end)
            .ok_or(IndexError::OutOfRange { offset: range.end, len })?;

        let before = self.text[..start]
            .char_indices()
            .rev()
            .nth(radius.saturating_sub(1))
            .map_or(0, |(i, _)| i);
        let after = self.text[end..]
            .char_indices()
            .nth(radius)
            .map_or(self.text.len(), |(i, _)| end + i);
        let before = if radius == 0 { start } else { before };

        Ok(self.text[before..after].replace('\n', " "))
    }
}

/// Flatten structural elements into a [`FlatDocument`]
pub fn extract(blocks: &[StructuralElement]) -> FlatDocument {
    let mut builder = Builder::default();
    for block in blocks {
        builder.visit_block(block);
    }
    debug!(
        "extract: {} runs, {} flat units",
        builder.doc.runs.len(),
        builder.doc.len()
    );
    builder.doc
}

#[derive(Default)]
struct Builder {
    doc: FlatDocument,
}

impl Builder {
    fn visit_block(&mut self, block: &StructuralElement) {
        if let Some(paragraph) = &block.paragraph {
            for element in &paragraph.elements {
                self.visit_element(element);
            }
        }
        if let Some(table) = &block.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    for inner in &cell.content {
                        self.visit_block(inner);
                    }
                }
            }
        }
    }

    fn visit_element(&mut self, element: &ParagraphElement) {
        let Some(content) = element.text_run.as_ref().and_then(|r| r.content.as_deref()) else {
            return;
        };
        if content.is_empty() {
            return;
        }
        let Some(doc_start) = element.start_index else {
            debug!("extract: skipping text run without a start index");
            return;
        };

        let units = utf16_len(content);
        let doc_end = element.end_index.unwrap_or(doc_start + units);
        if doc_end.checked_sub(doc_start) != Some(units) {
            debug!(
                "extract: skipping text run {}..{} whose content is {} units long",
                doc_start, doc_end, units
            );
            return;
        }

        let flat_start = self.doc.len();
        trace!("extract: run flat {}.. doc {}..{}", flat_start, doc_start, doc_end);
        self.doc.text.push_str(content);
        self.doc.runs.push(TextRun {
            flat_start,
            flat_end: flat_start + units,
            doc_start,
            doc_end,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Table, TableCell, TableRow, TextRunPayload};

    fn table_block(cells: Vec<Vec<StructuralElement>>, start: usize, end: usize) -> StructuralElement {
        StructuralElement {
            start_index: Some(start),
            end_index: Some(end),
            paragraph: None,
            table: Some(Table {
                table_rows: vec![TableRow {
                    table_cells: cells
                        .into_iter()
                        .map(|content| TableCell { content })
                        .collect(),
                }],
            }),
        }
    }

    #[test]
    fn test_extract_concatenates_runs_in_order() {
        let blocks = vec![
            StructuralElement::paragraph(vec![
                ParagraphElement::text(1, "Hello "),
                ParagraphElement::text(7, "world\n"),
            ]),
            StructuralElement::paragraph(vec![ParagraphElement::text(13, "Bye\n")]),
        ];

        let doc = extract(&blocks);
        assert_eq!(doc.text(), "Hello world\nBye\n");
        assert_eq!(doc.runs().len(), 3);
        assert_eq!(doc.runs()[1], TextRun { flat_start: 6, flat_end: 12, doc_start: 7, doc_end: 13 });
        assert_eq!(doc.len(), 16);
    }

    #[test]
    fn test_non_text_elements_leave_doc_gaps() {
        let blocks = vec![StructuralElement::paragraph(vec![
            ParagraphElement::text(1, "ab"),
            ParagraphElement::object(3, 1),
            ParagraphElement::text(4, "cd\n"),
        ])];

        let doc = extract(&blocks);
        assert_eq!(doc.text(), "abcd\n");
        assert_eq!(doc.runs()[0].doc_end, 3);
        assert_eq!(doc.runs()[1].doc_start, 4);
        assert_eq!(doc.runs()[0].flat_end, doc.runs()[1].flat_start);
    }

    #[test]
    fn test_table_cells_are_descended() {
        let cell_a = vec![StructuralElement::paragraph(vec![ParagraphElement::text(5, "A1\n")])];
        let cell_b = vec![StructuralElement::paragraph(vec![ParagraphElement::text(9, "B1\n")])];
        let blocks = vec![
            StructuralElement::paragraph(vec![ParagraphElement::text(1, "x\n")]),
            table_block(vec![cell_a, cell_b], 3, 13),
        ];

        let doc = extract(&blocks);
        assert_eq!(doc.text(), "x\nA1\nB1\n");
        assert_eq!(doc.runs()[1].doc_start, 5);
        assert_eq!(doc.runs()[2].doc_start, 9);
    }

    #[test]
    fn test_malformed_payloads_contribute_nothing() {
        let blocks = vec![StructuralElement::paragraph(vec![
            ParagraphElement {
                start_index: None,
                end_index: Some(3),
                text_run: Some(TextRunPayload { content: Some("no".into()) }),
            },
            ParagraphElement {
                start_index: Some(3),
                end_index: Some(9),
                text_run: Some(TextRunPayload { content: Some("short".into()) }),
            },
            ParagraphElement {
                start_index: Some(9),
                end_index: Some(9),
                text_run: Some(TextRunPayload { content: None }),
            },
            ParagraphElement::text(9, "ok"),
        ])];

        let doc = extract(&blocks);
        assert_eq!(doc.text(), "ok");
        assert_eq!(doc.runs().len(), 1);
        assert_eq!(doc.runs()[0].flat_start, 0);
    }

    #[test]
    fn test_unicode_runs_measured_in_utf16() {
        let blocks = vec![StructuralElement::paragraph(vec![
            ParagraphElement::text(1, "😀é"),
            ParagraphElement::text(4, "z"),
        ])];

        let doc = extract(&blocks);
        let run = doc.runs()[0];
        assert_eq!(run.flat_end - run.flat_start, 3);
        assert_eq!(run.doc_end - run.doc_start, 3);
        assert_eq!(doc.slice(FlatRange::new(2, 4)).unwrap(), "éz");
        assert!(doc.slice(FlatRange::new(1, 3)).is_err());
    }

    #[test]
    fn test_context_window() {
        let blocks = vec![StructuralElement::paragraph(vec![ParagraphElement::text(
            1,
            "one two\nthree four",
        )])];
        let doc = extract(&blocks);

        assert_eq!(doc.context(FlatRange::new(8, 13), 3).unwrap(), "wo three fo");
        assert_eq!(doc.context(FlatRange::new(0, 3), 2).unwrap(), "one t");
        assert_eq!(doc.context(FlatRange::new(0, 3), 0).unwrap(), "one");
    }
}
