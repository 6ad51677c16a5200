//! The `State` trait and the feedback stages.
//!
//! A [`FeedbackStage`] is never stored. It is derived from a
//! [`SessionState`](super::SessionState) whenever the shell needs to log,
//! project or record where the feedback workflow currently stands.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for named workflow stages.
///
/// All methods are pure. Implementations are usually generated with
/// [`state_enum!`](crate::state_enum).
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Label used in logs and history.
    fn name(&self) -> &str;

    /// Whether the stage is a stable resting point of the workflow.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

state_enum! {
    /// Where the feedback workflow stands for the current cluster assignment.
    ///
    /// ```text
    /// Unanswered -> Agreed
    /// Unanswered -> Disagreed -> CommentSubmitted
    /// ```
    ///
    /// `Agreed` and `CommentSubmitted` are stable until a reset or a new
    /// cluster assignment.
    pub enum FeedbackStage {
        /// No choice made yet.
        Unanswered => "unanswered",
        /// The user said the description matches.
        Agreed => "agreed",
        /// The user said the description does not match and may comment.
        Disagreed => "disagreed",
        /// A comment on the disagreement has been persisted.
        CommentSubmitted => "comment_submitted",
    }
    final: [Agreed, CommentSubmitted]
}

impl Default for FeedbackStage {
    fn default() -> Self {
        Self::Unanswered
    }
}
