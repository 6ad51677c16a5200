//! Comment violations.

use thiserror::Error;

/// Reasons a feedback comment is refused before it reaches the note store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentViolation {
    #[error("Comment is empty; please write your remarks before sending")]
    Empty,

    #[error("Comment is too long ({actual} characters, at most {max} allowed)")]
    TooLong { max: usize, actual: usize },
}
