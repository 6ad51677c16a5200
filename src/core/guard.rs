//! Guard predicates for controlling feedback transitions.
//!
//! Guards are pure boolean functions over a value (usually a
//! [`SessionState`]). Each transition in [`transition`](super::transition)
//! names the guard it is subject to.

use super::session::{ClusterId, FeedbackChoice, SessionState};
use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::core::{Guard, SessionState};
///
/// let untouched = Guard::new("untouched", |s: &SessionState| s.feedback_choice().is_none());
///
/// assert!(untouched.check(&SessionState::new()));
/// assert_eq!(untouched.name(), "untouched");
/// ```
pub struct Guard<T> {
    name: &'static str,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Guard<T> {
    /// Create a named guard from a pure predicate function.
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            name,
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows the transition.
    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    /// Name reported when the guard blocks an event.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}

/// No agree/disagree choice has been made yet.
pub fn choice_open() -> Guard<SessionState> {
    Guard::new("choice_open", |s: &SessionState| s.choice.is_none())
}

/// The user disagreed and has not had a comment persisted yet.
pub fn comment_open() -> Guard<SessionState> {
    Guard::new("comment_open", |s: &SessionState| {
        s.choice == Some(FeedbackChoice::DoesNotMatch) && !s.comment_submitted
    })
}

/// There is a choice to take back.
pub fn resettable() -> Guard<SessionState> {
    Guard::new("resettable", |s: &SessionState| s.choice.is_some())
}

/// `id` differs from the cluster the state last reacted to, or there is none.
pub fn cluster_changes(id: ClusterId) -> Guard<SessionState> {
    Guard::new("cluster_changes", move |s: &SessionState| {
        s.current_cluster_id.as_ref() != Some(&id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disagreed(submitted: bool) -> SessionState {
        SessionState {
            current_cluster_id: Some(ClusterId::from("Cluster 0")),
            choice: Some(FeedbackChoice::DoesNotMatch),
            comment_submitted: submitted,
            comment_draft: None,
        }
    }

    #[test]
    fn choice_open_only_without_choice() {
        let guard = choice_open();
        assert!(guard.check(&SessionState::new()));
        assert!(!guard.check(&disagreed(false)));
    }

    #[test]
    fn comment_open_requires_unsubmitted_disagreement() {
        let guard = comment_open();
        assert!(guard.check(&disagreed(false)));
        assert!(!guard.check(&disagreed(true)));

        let mut agreed = disagreed(false);
        agreed.choice = Some(FeedbackChoice::Matches);
        assert!(!guard.check(&agreed));
        assert!(!guard.check(&SessionState::new()));
    }

    #[test]
    fn resettable_requires_a_choice() {
        let guard = resettable();
        assert!(!guard.check(&SessionState::new()));
        assert!(guard.check(&disagreed(true)));
    }

    #[test]
    fn cluster_changes_on_first_and_different_ids() {
        let state = disagreed(false);

        assert!(cluster_changes(ClusterId::from("Cluster 0")).check(&SessionState::new()));
        assert!(cluster_changes(ClusterId::from("Cluster 1")).check(&state));
        assert!(!cluster_changes(ClusterId::from("Cluster 0")).check(&state));
    }

    #[test]
    fn guard_is_deterministic() {
        let state = disagreed(false);
        let guard = comment_open();

        assert_eq!(guard.check(&state), guard.check(&state));
        assert_eq!(guard.clone().name(), "comment_open");
    }
}
