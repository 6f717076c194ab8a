//! Replace planning.
//!
//! Turns flat-text matches into delete/insert operations in document index
//! space, ordered from the highest index down so that applying them one after
//! another never moves an index that a later operation still refers to.

use serde::Serialize;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::extract::{DocRange, FlatRange, TextRun};
use crate::mapper::map_to_doc_range;

/// A single edit against the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    Delete { range: DocRange },
    Insert { index: usize, text: String },
}

impl EditOperation {
    /// The lowest document index this operation touches
    pub fn index(&self) -> usize {
        match self {
            EditOperation::Delete { range } => range.start,
            EditOperation::Insert { index, .. } => *index,
        }
    }
}

/// Result of planning a replacement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacePlan {
    /// Matches that produced operations
    pub applied: usize,
    /// Matches that span non-text content and were left alone
    pub skipped: Vec<FlatRange>,
    pub operations: Vec<EditOperation>,
}

impl ReplacePlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Plan replacing `matches` with `replacement`.
///
/// With `replace_all == false` only the first match in document order is
/// considered; if that one is unmappable it is reported as skipped and no
/// later match is promoted in its place. An empty replacement plans deletes
/// only. Offsets outside the runs are a caller error and abort the plan.
pub fn plan_replacements(
    runs: &[TextRun],
    matches: &[FlatRange],
    replacement: &str,
    replace_all: bool,
) -> Result<ReplacePlan> {
    let mut ordered: Vec<FlatRange> = matches.to_vec();
    ordered.sort();
    if !replace_all {
        ordered.truncate(1);
    }

    let mut plan = ReplacePlan::default();
    let mut targets: Vec<DocRange> = Vec::with_capacity(ordered.len());
    for range in ordered {
        match map_to_doc_range(runs, range) {
            Ok(doc) => targets.push(doc),
            Err(IndexError::Unmappable { .. }) => {
                debug!("plan_replacements: skipping unmappable match {}..{}", range.start, range.end);
                plan.skipped.push(range);
            }
            Err(e) => return Err(e),
        }
    }

    targets.sort_by(|a, b| b.start.cmp(&a.start));
    plan.applied = targets.len();
    for doc in targets {
        plan.operations.push(EditOperation::Delete { range: doc });
        if !replacement.is_empty() {
            plan.operations.push(EditOperation::Insert {
                index: doc.start,
                text: replacement.to_string(),
            });
        }
    }

    debug!(
        "plan_replacements: {} planned, {} skipped, {} operations",
        plan.applied,
        plan.skipped.len(),
        plan.operations.len()
    );
    Ok(plan)
}

/// Order arbitrary edits so sequential application is safe: highest index
/// first, and at equal index a delete before the insert that follows it.
pub fn order_for_batch(operations: &mut [EditOperation]) {
    operations.sort_by(|a, b| {
        b.index().cmp(&a.index()).then_with(|| {
            let rank = |op: &EditOperation| matches!(op, EditOperation::Insert { .. }) as u8;
            rank(a).cmp(&rank(b))
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs() -> Vec<TextRun> {
        // "foo bar foo" at doc 1..12, image at 12, "foo\n" at 13..17
        vec![
            TextRun { flat_start: 0, flat_end: 11, doc_start: 1, doc_end: 12 },
            TextRun { flat_start: 11, flat_end: 15, doc_start: 13, doc_end: 17 },
        ]
    }

    #[test]
    fn test_replace_all_descending() {
        let matches = [FlatRange::new(0, 3), FlatRange::new(8, 11), FlatRange::new(11, 14)];
        let plan = plan_replacements(&runs(), &matches, "baz", true).unwrap();

        assert_eq!(plan.applied, 3);
        assert!(plan.skipped.is_empty());
        let indices: Vec<usize> = plan.operations.iter().map(EditOperation::index).collect();
        assert_eq!(indices, vec![13, 13, 9, 9, 1, 1]);
        assert_eq!(plan.operations[0], EditOperation::Delete { range: DocRange::new(13, 16) });
        assert_eq!(
            plan.operations[1],
            EditOperation::Insert { index: 13, text: "baz".into() }
        );
    }

    #[test]
    fn test_single_replace_uses_first_in_document_order() {
        let matches = [FlatRange::new(8, 11), FlatRange::new(0, 3)];
        let plan = plan_replacements(&runs(), &matches, "x", false).unwrap();
        assert_eq!(plan.applied, 1);
        assert_eq!(plan.operations[0], EditOperation::Delete { range: DocRange::new(1, 4) });
    }

    #[test]
    fn test_unmappable_is_counted_not_dropped() {
        let matches = [FlatRange::new(0, 3), FlatRange::new(10, 12)];
        let plan = plan_replacements(&runs(), &matches, "y", true).unwrap();
        assert_eq!(plan.applied, 1);
        assert_eq!(plan.skipped, vec![FlatRange::new(10, 12)]);
        assert_eq!(plan.applied + plan.skipped.len(), matches.len());
    }

    #[test]
    fn test_empty_replacement_deletes_only() {
        let plan = plan_replacements(&runs(), &[FlatRange::new(4, 8)], "", true).unwrap();
        assert_eq!(plan.operations, vec![EditOperation::Delete { range: DocRange::new(5, 9) }]);
    }

    #[test]
    fn test_no_matches_no_operations() {
        let plan = plan_replacements(&runs(), &[], "z", true).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.applied, 0);
    }

    #[test]
    fn test_out_of_range_match_is_error() {
        let result = plan_replacements(&runs(), &[FlatRange::new(14, 20)], "z", true);
        assert_eq!(result, Err(IndexError::OutOfRange { offset: 20, len: 15 }));
    }

    #[test]
    fn test_order_for_batch() {
        let mut ops = vec![
            EditOperation::Insert { index: 2, text: "a".into() },
            EditOperation::Delete { range: DocRange::new(2, 4) },
            EditOperation::Insert { index: 10, text: "b".into() },
        ];
        order_for_batch(&mut ops);
        assert_eq!(ops[0].index(), 10);
        assert!(matches!(ops[1], EditOperation::Delete { .. }));
        assert!(matches!(ops[2], EditOperation::Insert { .. }));
    }
}
