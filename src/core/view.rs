//! Display projection of the feedback state.

use super::session::SessionState;
use super::state::FeedbackStage;
use serde::Serialize;

/// Acknowledgement shown once the user has answered.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    /// "You chose: the description matches me."
    Agreed,
    /// "You chose: the description does not match me." plus a request for a comment.
    Disagreed,
    /// "Thanks for the extra remarks, your feedback was saved."
    ThankYou,
}

/// What the feedback panel shows. A pure function of [`SessionState`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FeedbackView {
    pub stage: FeedbackStage,
    /// Show the "matches" / "does not match" controls.
    pub choices_offered: bool,
    pub acknowledgement: Option<Acknowledgement>,
    /// Show the comment box and its submit control.
    pub comment_input_shown: bool,
    /// Current comment box content, when the box is shown.
    pub comment_draft: Option<String>,
    /// Show the "change my answer" control.
    pub reset_offered: bool,
}

/// Derive the feedback panel from `state`.
///
/// ```rust
/// use cluster_feedback::core::{project, SessionState};
///
/// let view = project(&SessionState::new());
/// assert!(view.choices_offered);
/// assert!(!view.reset_offered);
/// ```
pub fn project(state: &SessionState) -> FeedbackView {
    let stage = state.stage();
    let acknowledgement = match stage {
        FeedbackStage::Unanswered => None,
        FeedbackStage::Agreed => Some(Acknowledgement::Agreed),
        FeedbackStage::Disagreed => Some(Acknowledgement::Disagreed),
        FeedbackStage::CommentSubmitted => Some(Acknowledgement::ThankYou),
    };
    let comment_input_shown = stage == FeedbackStage::Disagreed;

    FeedbackView {
        stage,
        choices_offered: stage == FeedbackStage::Unanswered,
        acknowledgement,
        comment_input_shown,
        comment_draft: if comment_input_shown {
            state.comment_draft.clone()
        } else {
            None
        },
        reset_offered: state.choice.is_some(),
    }
}
