//! Rules a comment must satisfy before it is persisted.

use crate::validation::violations::CommentViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating a comment: the trimmed text, or every violation.
pub type CommentValidation = Validation<String, NonEmptyVec<CommentViolation>>;

/// Rules applied to a comment on submission.
///
/// By default any comment that is non-empty after trimming is accepted. A
/// length limit applies only when one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentRules {
    max_chars: Option<usize>,
}

impl CommentRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum comment length, counted in characters after trimming.
    pub fn max_chars(mut self, n: usize) -> Self {
        self.max_chars = Some(n);
        self
    }

    pub fn max_comment_chars(&self) -> Option<usize> {
        self.max_chars
    }

    /// Validate `text`, accumulating ALL violations.
    /// On success the trimmed comment is returned.
    pub fn validate(&self, text: &str) -> CommentValidation {
        let comment = text.trim();
        let mut checks: Vec<Validation<(), NonEmptyVec<CommentViolation>>> = Vec::new();

        checks.push(if comment.is_empty() {
            Validation::fail(CommentViolation::Empty)
        } else {
            Validation::success(())
        });

        if let Some(max) = self.max_chars {
            let actual = comment.chars().count();
            checks.push(if actual > max {
                Validation::fail(CommentViolation::TooLong { max, actual })
            } else {
                Validation::success(())
            });
        }

        let trimmed = comment.to_string();
        Validation::all_vec(checks).map(move |_| trimmed)
    }
}
