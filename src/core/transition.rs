//! The pure feedback transition function.
//!
//! [`transition`] never performs I/O. When a comment must be persisted it
//! returns [`Step::Persist`]; the shell runs the store effect and then adopts
//! [`mark_comment_submitted`]. Computing the next state is kept apart from
//! rendering it, which is [`project`](super::project)'s job.

use super::guard::{choice_open, cluster_changes, comment_open, resettable};
use super::session::{ClusterId, FeedbackChoice, SessionState};
use crate::validation::{CommentRules, CommentViolation};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Something the user (or the classifier) did.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum FeedbackEvent {
    /// The classifier produced a cluster for the current input record.
    AssignCluster(ClusterId),
    /// "The description matches me."
    ChooseMatches,
    /// "The description does not match me."
    ChooseDoesNotMatch,
    /// The comment box content changed.
    EditComment(String),
    /// Send the comment currently in the box.
    SubmitComment,
    /// Take back the agree/disagree choice.
    Reset,
}

impl FeedbackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssignCluster(_) => "assign_cluster",
            Self::ChooseMatches => "choose_matches",
            Self::ChooseDoesNotMatch => "choose_does_not_match",
            Self::EditComment(_) => "edit_comment",
            Self::SubmitComment => "submit_comment",
            Self::Reset => "reset",
        }
    }
}

/// Result of applying one event to a state.
#[derive(Clone, PartialEq, Debug)]
pub enum Step {
    /// Adopt this state.
    Changed(SessionState),
    /// A guard blocked the event; the state is unchanged.
    Ignored { guard: &'static str },
    /// The comment broke one or more rules; the state is unchanged.
    Rejected(NonEmptyVec<CommentViolation>),
    /// Persist `comment`, then adopt [`mark_comment_submitted`].
    Persist { comment: String },
}

/// Apply `event` to `state`.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::core::{transition, ClusterId, FeedbackEvent, SessionState, Step};
/// use cluster_feedback::validation::CommentRules;
///
/// let rules = CommentRules::new();
/// let state = SessionState::new();
///
/// let Step::Changed(state) =
///     transition(&state, &FeedbackEvent::AssignCluster(ClusterId::from("A")), &rules)
/// else {
///     panic!("first assignment always changes the state");
/// };
/// assert_eq!(state.current_cluster_id(), Some(&ClusterId::from("A")));
///
/// // Re-assigning the same cluster is a no-op.
/// let step = transition(&state, &FeedbackEvent::AssignCluster(ClusterId::from("A")), &rules);
/// assert!(matches!(step, Step::Ignored { .. }));
/// ```
pub fn transition(state: &SessionState, event: &FeedbackEvent, rules: &CommentRules) -> Step {
    match event {
        FeedbackEvent::AssignCluster(id) => {
            let guard = cluster_changes(id.clone());
            if !guard.check(state) {
                return Step::Ignored { guard: guard.name() };
            }
            match state.current_cluster_id {
                // First assignment: there is nothing to reset.
                None => Step::Changed(SessionState {
                    current_cluster_id: Some(id.clone()),
                    ..state.clone()
                }),
                Some(_) => Step::Changed(SessionState {
                    current_cluster_id: Some(id.clone()),
                    ..SessionState::default()
                }),
            }
        }
        FeedbackEvent::ChooseMatches => choose(state, FeedbackChoice::Matches),
        FeedbackEvent::ChooseDoesNotMatch => choose(state, FeedbackChoice::DoesNotMatch),
        FeedbackEvent::EditComment(text) => {
            let guard = comment_open();
            if !guard.check(state) {
                return Step::Ignored { guard: guard.name() };
            }
            Step::Changed(SessionState {
                comment_draft: Some(text.clone()),
                ..state.clone()
            })
        }
        FeedbackEvent::SubmitComment => {
            let guard = comment_open();
            if !guard.check(state) {
                return Step::Ignored { guard: guard.name() };
            }
            match rules.validate(state.comment_draft.as_deref().unwrap_or_default()) {
                Validation::Success(comment) => Step::Persist { comment },
                Validation::Failure(violations) => Step::Rejected(violations),
            }
        }
        FeedbackEvent::Reset => {
            let guard = resettable();
            if !guard.check(state) {
                return Step::Ignored { guard: guard.name() };
            }
            Step::Changed(state.cleared_feedback())
        }
    }
}

fn choose(state: &SessionState, choice: FeedbackChoice) -> Step {
    let guard = choice_open();
    if !guard.check(state) {
        return Step::Ignored { guard: guard.name() };
    }
    Step::Changed(SessionState {
        choice: Some(choice),
        comment_submitted: false,
        comment_draft: None,
        ..state.clone()
    })
}

/// State to adopt once the comment from [`Step::Persist`] has been stored.
pub fn mark_comment_submitted(state: &SessionState) -> SessionState {
    SessionState {
        comment_submitted: true,
        comment_draft: None,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FeedbackStage;

    fn apply(state: &SessionState, event: FeedbackEvent) -> SessionState {
        match transition(state, &event, &CommentRules::new()) {
            Step::Changed(next) => next,
            Step::Persist { .. } => mark_comment_submitted(state),
            other => panic!("{} did not change the state: {other:?}", event.name()),
        }
    }

    fn assign(state: &SessionState, id: &str) -> SessionState {
        apply(state, FeedbackEvent::AssignCluster(ClusterId::from(id)))
    }

    #[test]
    fn first_assignment_sets_cluster_only() {
        let state = assign(&SessionState::new(), "A");

        assert_eq!(state.current_cluster_id(), Some(&ClusterId::from("A")));
        assert!(state.feedback_choice().is_none());
        assert!(!state.feedback_comment_submitted());
        assert!(state.feedback_comment_text().is_none());
    }

    #[test]
    fn first_assignment_does_not_touch_existing_fields() {
        // A choice made before any cluster was known survives the first
        // assignment; only a change of cluster resets feedback.
        let state = SessionState {
            choice: Some(FeedbackChoice::Matches),
            ..SessionState::default()
        };

        let state = assign(&state, "A");

        assert_eq!(state.feedback_choice(), Some(FeedbackChoice::Matches));
    }

    #[test]
    fn changing_cluster_resets_feedback() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);
        let state = apply(&state, FeedbackEvent::EditComment("typed, never sent".into()));

        let state = assign(&state, "B");

        assert_eq!(state.current_cluster_id(), Some(&ClusterId::from("B")));
        assert!(state.feedback_choice().is_none());
        assert!(!state.feedback_comment_submitted());
        assert!(state.feedback_comment_text().is_none());
    }

    #[test]
    fn same_cluster_is_ignored() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseMatches);

        let step = transition(
            &state,
            &FeedbackEvent::AssignCluster(ClusterId::from("A")),
            &CommentRules::new(),
        );

        assert_eq!(step, Step::Ignored { guard: "cluster_changes" });
    }

    #[test]
    fn choices_only_from_unanswered() {
        let state = assign(&SessionState::new(), "A");
        let agreed = apply(&state, FeedbackEvent::ChooseMatches);
        assert_eq!(agreed.stage(), FeedbackStage::Agreed);

        let step = transition(&agreed, &FeedbackEvent::ChooseDoesNotMatch, &CommentRules::new());
        assert_eq!(step, Step::Ignored { guard: "choice_open" });
    }

    #[test]
    fn edit_is_ignored_outside_disagreement() {
        let state = assign(&SessionState::new(), "A");

        let step = transition(&state, &FeedbackEvent::EditComment("hi".into()), &CommentRules::new());

        assert_eq!(step, Step::Ignored { guard: "comment_open" });
    }

    #[test]
    fn submit_requests_persistence_of_trimmed_draft() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);
        let state = apply(&state, FeedbackEvent::EditComment("  too vague ".into()));

        let step = transition(&state, &FeedbackEvent::SubmitComment, &CommentRules::new());

        assert_eq!(
            step,
            Step::Persist {
                comment: "too vague".to_string()
            }
        );
    }

    #[test]
    fn submit_without_draft_is_rejected() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);

        match transition(&state, &FeedbackEvent::SubmitComment, &CommentRules::new()) {
            Step::Rejected(violations) => {
                assert_eq!(violations.head(), &CommentViolation::Empty);
            }
            other => panic!("Expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn submit_after_submission_is_ignored() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);
        let state = mark_comment_submitted(&state);

        let step = transition(&state, &FeedbackEvent::SubmitComment, &CommentRules::new());

        assert_eq!(step, Step::Ignored { guard: "comment_open" });
        assert_eq!(state.stage(), FeedbackStage::CommentSubmitted);
    }

    #[test]
    fn reset_clears_feedback_and_keeps_cluster() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);
        let state = mark_comment_submitted(&state);

        let state = apply(&state, FeedbackEvent::Reset);

        assert_eq!(state.current_cluster_id(), Some(&ClusterId::from("A")));
        assert_eq!(state.stage(), FeedbackStage::Unanswered);
        assert!(!state.feedback_comment_submitted());
    }

    #[test]
    fn reset_without_choice_is_ignored() {
        let state = assign(&SessionState::new(), "A");

        let step = transition(&state, &FeedbackEvent::Reset, &CommentRules::new());

        assert_eq!(step, Step::Ignored { guard: "resettable" });
    }

    #[test]
    fn mark_submitted_discards_draft() {
        let state = assign(&SessionState::new(), "A");
        let state = apply(&state, FeedbackEvent::ChooseDoesNotMatch);
        let state = apply(&state, FeedbackEvent::EditComment("draft".into()));

        let state = mark_comment_submitted(&state);

        assert!(state.feedback_comment_submitted());
        assert!(state.feedback_comment_text().is_none());
    }
}
