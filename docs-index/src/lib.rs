//! Document text index for Google Docs content.
//!
//! This crate provides:
//! - Run-length extraction of a segment's text into one flat string
//! - Mapping between flat offsets and document indices
//! - Non-overlapping substring search, case-sensitive or not
//! - Replace and case-change planning as ordered delete/insert edits
//!
//! Everything here is pure and synchronous. Offsets, both flat and document,
//! are counted in UTF-16 code units as the Docs API does.
//!
//! ```
//! use docs_index::{extract, ParagraphElement, StructuralElement};
//!
//! let doc = extract(&[StructuralElement::paragraph(vec![
//!     ParagraphElement::text(1, "Hello WORLD world\n"),
//! ])]);
//! let plan = doc.plan_replace("world", "there", false, true).unwrap();
//! assert_eq!(plan.applied, 2);
//! ```

pub mod case;
pub mod document;
pub mod error;
pub mod extract;
pub mod mapper;
pub mod replace;
pub mod search;
pub mod stats;
mod text_index;
pub mod units;

pub use case::{apply_case, plan_case_change, TextCase};
pub use document::{Body, Paragraph, ParagraphElement, StructuralElement, TextRunPayload};
pub use error::{IndexError, Result};
pub use extract::{extract, DocRange, FlatDocument, FlatRange, TextRun};
pub use mapper::{flat_range_for, map_offset, map_to_doc_range};
pub use replace::{order_for_batch, plan_replacements, EditOperation, ReplacePlan};
pub use search::{find_all, find_all_in, Matches};
pub use stats::{text_stats, TextStats};
pub use text_index::{FindOptions, Match};
