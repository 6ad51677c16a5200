//! End-to-end session scenarios against in-process note stores.

use cluster_feedback::core::{ClusterId, FeedbackChoice, FeedbackEvent, FeedbackStage};
use cluster_feedback::effects::{
    Dispatch, FeedbackEnv, InMemoryNoteStore, Note, NoteStore, PersistedNote, Session,
    SessionError, StoreError,
};
use cluster_feedback::validation::CommentRules;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn session_with(store: Arc<dyn NoteStore>) -> Session {
    Session::new(FeedbackEnv::new(store), CommentRules::new())
}

/// Store whose appends always fail, counting how often it was asked.
#[derive(Default)]
struct BrokenStore {
    appends: AtomicUsize,
}

impl NoteStore for BrokenStore {
    fn count(&self) -> Result<u64, StoreError> {
        Ok(3)
    }

    fn append(&self, _id: u64, _text: &str) -> Result<(), StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[test]
fn disagree_comment_then_new_cluster() {
    let store = Arc::new(InMemoryNoteStore::new());
    store.append(1, "earlier feedback").unwrap();
    let mut session = session_with(store.clone());

    session.assign_cluster(ClusterId::from("A")).unwrap();
    assert_eq!(session.state().current_cluster_id(), Some(&ClusterId::from("A")));
    assert_eq!(session.state().feedback_choice(), None);

    session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();
    assert_eq!(
        session.state().feedback_choice(),
        Some(FeedbackChoice::DoesNotMatch)
    );
    assert!(!session.state().feedback_comment_submitted());

    let result = session.submit_comment("too vague").unwrap();
    assert_eq!(result, Dispatch::Persisted(PersistedNote { id: 2, chars: 9 }));
    assert_eq!(
        store.notes(),
        vec![
            Note { id: 1, text: "earlier feedback".to_string() },
            Note { id: 2, text: "too vague".to_string() },
        ]
    );
    assert!(session.state().feedback_comment_submitted());
    assert_eq!(session.state().stage(), FeedbackStage::CommentSubmitted);

    session.assign_cluster(ClusterId::from("B")).unwrap();
    assert_eq!(session.state().current_cluster_id(), Some(&ClusterId::from("B")));
    assert_eq!(session.state().feedback_choice(), None);
    assert!(!session.state().feedback_comment_submitted());
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn agree_then_reset_keeps_cluster() {
    let mut session = session_with(Arc::new(InMemoryNoteStore::new()));

    session.assign_cluster(ClusterId::from("A")).unwrap();
    session.dispatch(FeedbackEvent::ChooseMatches).unwrap();
    assert!(session.view().reset_offered);

    let result = session.dispatch(FeedbackEvent::Reset).unwrap();

    assert_eq!(
        result,
        Dispatch::Applied {
            from: FeedbackStage::Agreed,
            to: FeedbackStage::Unanswered
        }
    );
    assert_eq!(session.state().feedback_choice(), None);
    assert!(!session.state().feedback_comment_submitted());
    assert_eq!(session.state().current_cluster_id(), Some(&ClusterId::from("A")));
    assert!(session.view().choices_offered);
}

#[test]
fn rerun_with_same_cluster_keeps_answer() {
    let mut session = session_with(Arc::new(InMemoryNoteStore::new()));
    session.assign_cluster(ClusterId::from("A")).unwrap();
    session.dispatch(FeedbackEvent::ChooseMatches).unwrap();

    let result = session.assign_cluster(ClusterId::from("A")).unwrap();

    assert_eq!(result, Dispatch::Ignored { guard: "cluster_changes" });
    assert_eq!(session.state().feedback_choice(), Some(FeedbackChoice::Matches));
}

#[test]
fn store_failure_propagates_and_keeps_comment_open() {
    let store = Arc::new(BrokenStore::default());
    let mut session = session_with(store.clone());
    session.assign_cluster(ClusterId::from("A")).unwrap();
    session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();

    let result = session.submit_comment("too vague");

    match result {
        Err(SessionError::Persist(StoreError::Unavailable(_))) => {}
        other => panic!("Expected persist error, got {other:?}"),
    }
    assert_eq!(store.appends.load(Ordering::SeqCst), 1);
    assert!(!session.state().feedback_comment_submitted());
    assert_eq!(session.state().stage(), FeedbackStage::Disagreed);
    assert_eq!(session.state().feedback_comment_text(), Some("too vague"));
}

#[test]
fn sessions_share_the_id_sequence() {
    let store = Arc::new(InMemoryNoteStore::new());
    let mut first = session_with(store.clone());
    let mut second = session_with(store.clone());

    for session in [&mut first, &mut second] {
        session.assign_cluster(ClusterId::from("A")).unwrap();
        session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();
    }

    first.submit_comment("one").unwrap();
    let result = second.submit_comment("two").unwrap();

    assert_eq!(result, Dispatch::Persisted(PersistedNote { id: 2, chars: 3 }));
    assert_eq!(store.count().unwrap(), 2);
}

/// Store that reports the count it saw when created, however many notes it holds.
struct StaleCountStore {
    inner: InMemoryNoteStore,
    count: u64,
}

impl NoteStore for StaleCountStore {
    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.count)
    }

    fn append(&self, id: u64, text: &str) -> Result<(), StoreError> {
        self.inner.append(id, text)
    }
}

#[test]
fn concurrent_sessions_with_stale_count_overwrite_each_other() {
    let store = Arc::new(StaleCountStore { inner: InMemoryNoteStore::new(), count: 0 });
    let mut first = session_with(store.clone());
    let mut second = session_with(store.clone());

    for session in [&mut first, &mut second] {
        session.assign_cluster(ClusterId::from("A")).unwrap();
        session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();
    }

    let one = first.submit_comment("one").unwrap();
    let two = second.submit_comment("two").unwrap();

    assert_eq!(one, Dispatch::Persisted(PersistedNote { id: 1, chars: 3 }));
    assert_eq!(two, Dispatch::Persisted(PersistedNote { id: 1, chars: 3 }));
    assert!(first.state().feedback_comment_submitted());
    assert!(second.state().feedback_comment_submitted());
    assert_eq!(
        store.inner.notes(),
        vec![Note { id: 1, text: "two".to_string() }]
    );
}

#[test]
fn long_comment_is_persisted_under_default_rules() {
    let store = Arc::new(InMemoryNoteStore::new());
    let mut session = session_with(store.clone());
    session.assign_cluster(ClusterId::from("A")).unwrap();
    session.dispatch(FeedbackEvent::ChooseDoesNotMatch).unwrap();

    let result = session.submit_comment("x".repeat(2001)).unwrap();

    assert_eq!(result, Dispatch::Persisted(PersistedNote { id: 1, chars: 2001 }));
    assert_eq!(store.count().unwrap(), 1);
    assert!(session.state().feedback_comment_submitted());
}
