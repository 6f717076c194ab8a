use thiserror::Error;

/// Errors surfaced by the text index.
///
/// `Unmappable` is normally folded into a skip count by the replace planner
/// rather than returned; it escapes only from direct mapper calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("search text must not be empty")]
    InvalidQuery,

    #[error("flat range {start}..{end} spans non-text content and has no contiguous document range")]
    Unmappable { start: usize, end: usize },

    #[error("offset {offset} is outside the flat text (length {len})")]
    OutOfRange { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;
