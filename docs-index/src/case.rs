//! Case transformation planning.
//!
//! The Docs API has no in-place case change, so each run segment inside the
//! target range whose text would change is deleted and re-inserted.

use serde::Deserialize;

use crate::error::Result;
use crate::extract::{DocRange, FlatDocument, FlatRange};
use crate::mapper::flat_range_for;
use crate::replace::{order_for_batch, EditOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    Upper,
    Lower,
    /// First letter of every word upper, the rest lower
    Title,
    /// First letter of every sentence upper, the rest lower
    Sentence,
}

/// Carries word and sentence position across run boundaries
#[derive(Debug, Clone, Copy)]
struct CaseState {
    in_word: bool,
    sentence_start: bool,
    after_terminator: bool,
}

impl Default for CaseState {
    fn default() -> Self {
        Self {
            in_word: false,
            sentence_start: true,
            after_terminator: false,
        }
    }
}

fn transform(text: &str, case: TextCase, state: &mut CaseState) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match case {
            TextCase::Upper => out.extend(ch.to_uppercase()),
            TextCase::Lower => out.extend(ch.to_lowercase()),
            TextCase::Title => {
                if ch.is_alphanumeric() {
                    if state.in_word {
                        out.extend(ch.to_lowercase());
                    } else {
                        out.extend(ch.to_uppercase());
                    }
                    state.in_word = true;
                } else {
                    out.push(ch);
                    state.in_word = ch == '\'' && state.in_word;
                }
            }
            TextCase::Sentence => {
                if ch.is_alphabetic() && state.sentence_start {
                    out.extend(ch.to_uppercase());
                    state.sentence_start = false;
                } else {
                    out.extend(ch.to_lowercase());
                    if ch.is_alphanumeric() {
                        state.sentence_start = false;
                    }
                }
                if matches!(ch, '.' | '!' | '?') {
                    state.after_terminator = true;
                } else if ch.is_whitespace() {
                    if state.after_terminator || ch == '\n' {
                        state.sentence_start = true;
                    }
                    state.after_terminator = false;
                } else {
                    state.after_terminator = false;
                }
            }
        }
    }
    out
}

/// Apply `case` to a standalone string
pub fn apply_case(text: &str, case: TextCase) -> String {
    transform(text, case, &mut CaseState::default())
}

/// Plan the edits that change the case of all text inside `range`.
///
/// The range start is treated as the start of a word and a sentence.
/// Segments whose text is already in the target case produce no edits.
/// A range boundary that splits a surrogate pair is `OutOfRange`.
pub fn plan_case_change(doc: &FlatDocument, range: DocRange, case: TextCase) -> Result<Vec<EditOperation>> {
    let Some(flat) = flat_range_for(doc.runs(), range) else {
        return Ok(Vec::new());
    };

    let mut state = CaseState::default();
    let mut operations = Vec::new();
    for run in doc.runs() {
        let start = run.flat_start.max(flat.start);
        let end = run.flat_end.min(flat.end);
        if start >= end {
            continue;
        }
        let original = doc.slice(FlatRange::new(start, end))?;
        let changed = transform(original, case, &mut state);
        if changed == original {
            continue;
        }
        let doc_start = run.doc_start + (start - run.flat_start);
        let doc_end = run.doc_start + (end - run.flat_start);
        operations.push(EditOperation::Delete {
            range: DocRange::new(doc_start, doc_end),
        });
        operations.push(EditOperation::Insert {
            index: doc_start,
            text: changed,
        });
    }

    order_for_batch(&mut operations);
    Ok(operations)
}
