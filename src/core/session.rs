//! Per-session feedback state.
//!
//! [`SessionState`] is the only mutable thing a dashboard session owns. It is
//! created empty, changed only by [`transition`](super::transition) results,
//! and dropped with the session.

use super::state::FeedbackStage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a respondent cluster, as produced by the classifier.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::core::ClusterId;
///
/// let id = ClusterId::from("Cluster 3");
/// assert_eq!(id.as_str(), "Cluster 3");
/// assert_eq!(id.to_string(), "Cluster 3");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClusterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClusterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's agree/disagree answer for the current cluster.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackChoice {
    Matches,
    DoesNotMatch,
}

impl FeedbackChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::DoesNotMatch => "does_not_match",
        }
    }
}

impl fmt::Display for FeedbackChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback state for one session.
///
/// Fields are read-only from outside the core; new values come from
/// [`transition`](super::transition) and
/// [`mark_comment_submitted`](super::mark_comment_submitted).
///
/// Invariants held by every value the core produces:
/// - `comment_submitted` implies `choice == Some(DoesNotMatch)`;
/// - `comment_draft` is `Some` only while the stage is
///   [`FeedbackStage::Disagreed`].
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) current_cluster_id: Option<ClusterId>,
    pub(crate) choice: Option<FeedbackChoice>,
    pub(crate) comment_submitted: bool,
    pub(crate) comment_draft: Option<String>,
}

impl SessionState {
    /// Empty state at session start: no cluster, no choice, no comment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_cluster_id(&self) -> Option<&ClusterId> {
        self.current_cluster_id.as_ref()
    }

    pub fn feedback_choice(&self) -> Option<FeedbackChoice> {
        self.choice
    }

    pub fn feedback_comment_submitted(&self) -> bool {
        self.comment_submitted
    }

    /// The comment being composed, if any.
    pub fn feedback_comment_text(&self) -> Option<&str> {
        self.comment_draft.as_deref()
    }

    /// Derive the workflow stage from the stored fields.
    pub fn stage(&self) -> FeedbackStage {
        match (self.choice, self.comment_submitted) {
            (None, _) => FeedbackStage::Unanswered,
            (Some(FeedbackChoice::Matches), _) => FeedbackStage::Agreed,
            (Some(FeedbackChoice::DoesNotMatch), false) => FeedbackStage::Disagreed,
            (Some(FeedbackChoice::DoesNotMatch), true) => FeedbackStage::CommentSubmitted,
        }
    }

    /// Clear choice, submission flag and draft. The cluster is kept.
    pub(crate) fn cleared_feedback(&self) -> Self {
        Self {
            current_cluster_id: self.current_cluster_id.clone(),
            ..Self::default()
        }
    }
}
