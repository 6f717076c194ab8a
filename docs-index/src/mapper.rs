//! Translation between flat-text offsets and document indices.

use crate::error::{IndexError, Result};
use crate::extract::{DocRange, FlatRange, TextRun};

fn flat_len(runs: &[TextRun]) -> usize {
    runs.last().map_or(0, |r| r.flat_end)
}

/// Map a flat range onto one contiguous document range.
///
/// Runs that touch in document space (a bold word mid-sentence) are bridged.
/// A range that crosses a gap left by non-text content is `Unmappable`.
pub fn map_to_doc_range(runs: &[TextRun], range: FlatRange) -> Result<DocRange> {
    let len = flat_len(runs);
    if range.start > range.end {
        return Err(IndexError::OutOfRange { offset: range.start, len });
    }
    if range.end > len {
        return Err(IndexError::OutOfRange { offset: range.end, len });
    }
    if range.is_empty() {
        let index = map_offset(runs, range.start)?;
        return Ok(DocRange::new(index, index));
    }

    let first = runs.partition_point(|r| r.flat_end <= range.start);
    let last = runs.partition_point(|r| r.flat_end < range.end);

    let bridged = runs[first..=last]
        .windows(2)
        .all(|pair| pair[0].doc_end == pair[1].doc_start);
    if !bridged {
        return Err(IndexError::Unmappable { start: range.start, end: range.end });
    }

    let start_run = &runs[first];
    let end_run = &runs[last];
    Ok(DocRange::new(
        start_run.doc_start + (range.start - start_run.flat_start),
        end_run.doc_start + (range.end - end_run.flat_start),
    ))
}

/// Document index of the position just before flat offset `offset`.
///
/// At a run boundary this resolves to the start of the following run; the end
/// of the text resolves to the end of the last run.
pub fn map_offset(runs: &[TextRun], offset: usize) -> Result<usize> {
    let len = flat_len(runs);
    let Some(last) = runs.last() else {
        return Err(IndexError::OutOfRange { offset, len });
    };
    if offset > len {
        return Err(IndexError::OutOfRange { offset, len });
    }
    if offset == len {
        return Ok(last.doc_end);
    }
    let run = &runs[runs.partition_point(|r| r.flat_end <= offset)];
    Ok(run.doc_start + (offset - run.flat_start))
}

/// The flat range covering the text inside a document range.
///
/// Portions of `doc` with no text are dropped. Returns `None` when no text
/// run overlaps `doc` at all.
pub fn flat_range_for(runs: &[TextRun], doc: DocRange) -> Option<FlatRange> {
    let first = runs.iter().find(|r| r.doc_end > doc.start && r.doc_start < doc.end)?;
    let last = runs
        .iter()
        .rev()
        .find(|r| r.doc_end > doc.start && r.doc_start < doc.end)?;

    let start = first.flat_start + doc.start.saturating_sub(first.doc_start);
    let end = last.flat_start + (doc.end.min(last.doc_end) - last.doc_start);
    Some(FlatRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(flat_start: usize, flat_end: usize, doc_start: usize) -> TextRun {
        TextRun {
            flat_start,
            flat_end,
            doc_start,
            doc_end: doc_start + (flat_end - flat_start),
        }
    }

    // "Hello " [1,7) + "bold" [7,11) + image at 11 + " tail\n" [12,18)
    fn runs() -> Vec<TextRun> {
        vec![run(0, 6, 1), run(6, 10, 7), run(10, 16, 12)]
    }

    #[test]
    fn test_map_within_single_run() {
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(1, 4)).unwrap(), DocRange::new(2, 5));
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(10, 15)).unwrap(), DocRange::new(12, 17));
    }

    #[test]
    fn test_adjacent_runs_are_bridged() {
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(4, 8)).unwrap(), DocRange::new(5, 9));
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(0, 10)).unwrap(), DocRange::new(1, 11));
    }

    #[test]
    fn test_gap_is_unmappable() {
        assert_eq!(
            map_to_doc_range(&runs(), FlatRange::new(8, 12)),
            Err(IndexError::Unmappable { start: 8, end: 12 })
        );
    }

    #[test]
    fn test_range_ending_at_run_boundary() {
        // Ends exactly where the gap begins; no bridging needed
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(6, 10)).unwrap(), DocRange::new(7, 11));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            map_to_doc_range(&runs(), FlatRange::new(3, 17)),
            Err(IndexError::OutOfRange { offset: 17, len: 16 })
        );
        assert!(map_to_doc_range(&runs(), FlatRange { start: 5, end: 2 }).is_err());
        assert!(map_offset(&[], 0).is_err());
    }

    #[test]
    fn test_map_offset() {
        assert_eq!(map_offset(&runs(), 0).unwrap(), 1);
        assert_eq!(map_offset(&runs(), 10).unwrap(), 12);
        assert_eq!(map_offset(&runs(), 16).unwrap(), 18);
        assert_eq!(map_to_doc_range(&runs(), FlatRange::new(6, 6)).unwrap(), DocRange::new(7, 7));
    }

    #[test]
    fn test_flat_range_for_doc_range() {
        assert_eq!(flat_range_for(&runs(), DocRange::new(3, 9)), Some(FlatRange::new(2, 8)));
        // Starts on the image, ends past the text
        assert_eq!(flat_range_for(&runs(), DocRange::new(11, 40)), Some(FlatRange::new(10, 16)));
        assert_eq!(flat_range_for(&runs(), DocRange::new(0, 1)), None);
    }
}
