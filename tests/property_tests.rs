//! Property-based tests for the feedback state machine.
//!
//! States are reached by folding arbitrary event sequences through the pure
//! transition function, so every generated state is one a session can
//! actually be in.

use cluster_feedback::core::{
    mark_comment_submitted, transition, ClusterId, FeedbackChoice, FeedbackEvent, FeedbackStage,
    SessionState, State, Step,
};
use cluster_feedback::effects::{Dispatch, FeedbackEnv, InMemoryNoteStore, NoteStore, Session};
use cluster_feedback::validation::CommentRules;
use proptest::prelude::*;
use std::sync::Arc;

prop_compose! {
    fn arbitrary_cluster()(id in prop_oneof![Just("A"), Just("B"), Just("C")]) -> ClusterId {
        ClusterId::from(id)
    }
}

fn arbitrary_event() -> impl Strategy<Value = FeedbackEvent> {
    prop_oneof![
        arbitrary_cluster().prop_map(FeedbackEvent::AssignCluster),
        Just(FeedbackEvent::ChooseMatches),
        Just(FeedbackEvent::ChooseDoesNotMatch),
        "[ a-z]{0,12}".prop_map(FeedbackEvent::EditComment),
        Just(FeedbackEvent::SubmitComment),
        Just(FeedbackEvent::Reset),
    ]
}

/// Apply one event the way the session does, treating every persist as a
/// successful store call.
fn drive(state: SessionState, event: &FeedbackEvent) -> SessionState {
    match transition(&state, event, &CommentRules::new()) {
        Step::Changed(next) => next,
        Step::Persist { .. } => mark_comment_submitted(&state),
        Step::Ignored { .. } | Step::Rejected(_) => state,
    }
}

prop_compose! {
    fn reachable_state()(events in prop::collection::vec(arbitrary_event(), 0..24)) -> SessionState {
        events.iter().fold(SessionState::new(), drive)
    }
}

prop_compose! {
    fn disagreed_session()(cluster in arbitrary_cluster())
        -> (Session, Arc<InMemoryNoteStore>)
    {
        let store = Arc::new(InMemoryNoteStore::new());
        let mut session = Session::new(FeedbackEnv::new(store.clone()), CommentRules::new());
        session.assign_cluster(cluster).unwrap();
        session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();
        (session, store)
    }
}

proptest! {
    #[test]
    fn first_assignment_leaves_feedback_unanswered(cluster in arbitrary_cluster()) {
        let state = drive(SessionState::new(), &FeedbackEvent::AssignCluster(cluster.clone()));

        prop_assert_eq!(state.current_cluster_id(), Some(&cluster));
        prop_assert_eq!(state.feedback_choice(), None);
        prop_assert!(!state.feedback_comment_submitted());
    }

    #[test]
    fn cluster_change_clears_feedback(
        state in reachable_state(),
        cluster in arbitrary_cluster(),
    ) {
        prop_assume!(state.current_cluster_id().is_some());
        prop_assume!(state.current_cluster_id() != Some(&cluster));

        let next = drive(state, &FeedbackEvent::AssignCluster(cluster.clone()));

        prop_assert_eq!(next.current_cluster_id(), Some(&cluster));
        prop_assert_eq!(next.feedback_choice(), None);
        prop_assert!(!next.feedback_comment_submitted());
        prop_assert_eq!(next.feedback_comment_text(), None);
    }

    #[test]
    fn same_cluster_leaves_state_untouched(state in reachable_state()) {
        let Some(current) = state.current_cluster_id().cloned() else {
            return Ok(());
        };

        let step = transition(&state, &FeedbackEvent::AssignCluster(current), &CommentRules::new());

        prop_assert!(matches!(step, Step::Ignored { .. }), "got {:?}", step);
    }

    #[test]
    fn submit_outside_open_comment_is_a_no_op(state in reachable_state()) {
        prop_assume!(state.stage() != FeedbackStage::Disagreed);

        let next = drive(state.clone(), &FeedbackEvent::SubmitComment);

        prop_assert_eq!(next, state);
    }

    #[test]
    fn blank_comment_never_reaches_the_store(
        (mut session, store) in disagreed_session(),
        blank in "[ \t\n]{0,8}",
    ) {
        let result = session.submit_comment(blank).unwrap();

        prop_assert!(matches!(result, Dispatch::Rejected(_)));
        prop_assert!(!session.state().feedback_comment_submitted());
        prop_assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn non_blank_comment_of_any_length_is_persisted(
        (mut session, store) in disagreed_session(),
        len in 1usize..5000,
    ) {
        let result = session.submit_comment("x".repeat(len)).unwrap();

        prop_assert!(matches!(result, Dispatch::Persisted(_)), "got {:?}", result);
        prop_assert!(session.state().feedback_comment_submitted());
        prop_assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn submitted_flag_implies_disagreement(state in reachable_state()) {
        if state.feedback_comment_submitted() {
            prop_assert_eq!(state.feedback_choice(), Some(FeedbackChoice::DoesNotMatch));
            prop_assert_eq!(state.feedback_comment_text(), None);
        }
    }

    #[test]
    fn draft_only_exists_while_comment_is_open(state in reachable_state()) {
        if state.feedback_comment_text().is_some() {
            prop_assert_eq!(state.stage(), FeedbackStage::Disagreed);
        }
    }

    #[test]
    fn transition_is_pure(state in reachable_state(), event in arbitrary_event()) {
        let before = state.clone();
        let rules = CommentRules::new();

        let first = transition(&state, &event, &rules);
        let second = transition(&state, &event, &rules);

        prop_assert_eq!(first, second);
        prop_assert_eq!(state, before);
    }

    #[test]
    fn final_stages_are_agreement_or_submitted_comment(state in reachable_state()) {
        let stage = state.stage();
        let settled = state.feedback_choice() == Some(FeedbackChoice::Matches)
            || state.feedback_comment_submitted();

        prop_assert_eq!(stage.is_final(), settled);
        prop_assert_eq!(
            stage.is_final(),
            matches!(stage, FeedbackStage::Agreed | FeedbackStage::CommentSubmitted)
        );
    }

    #[test]
    fn state_roundtrip_serialization(state in reachable_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, restored);
    }
}
