//! One dashboard session: the feedback state plus the shell around it.

use crate::core::{
    mark_comment_submitted, project, transition, ClusterId, FeedbackEvent, FeedbackStage,
    FeedbackView, SessionHistory, SessionState, StageChange, Step,
};
use crate::effects::persist::{persist_note, FeedbackEnv, PersistedNote};
use crate::effects::store::StoreError;
use crate::validation::{CommentRules, CommentViolation};
use chrono::Utc;
use stillwater::{Effect, NonEmptyVec};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors that abort handling of an event.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to persist feedback comment: {0}")]
    Persist(#[from] StoreError),
}

/// What happened when an event was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The state changed.
    Applied {
        from: FeedbackStage,
        to: FeedbackStage,
    },
    /// A guard blocked the event; nothing changed.
    Ignored { guard: &'static str },
    /// The comment was refused; nothing changed. Show these as a warning.
    Rejected(NonEmptyVec<CommentViolation>),
    /// The comment was stored and the state marked as submitted.
    Persisted(PersistedNote),
}

/// Owns a [`SessionState`] and threads it through every event.
///
/// After each [`dispatch`](Session::dispatch) the caller re-renders from
/// [`view`](Session::view); the session never renders on its own.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    history: SessionHistory,
    rules: CommentRules,
    env: FeedbackEnv,
}

impl Session {
    pub fn new(env: FeedbackEnv, rules: CommentRules) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "session started");
        Self {
            id,
            state: SessionState::new(),
            history: SessionHistory::new(),
            rules,
            env,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Display projection of the current state.
    pub fn view(&self) -> FeedbackView {
        project(&self.state)
    }

    /// Apply one event.
    ///
    /// A failing note store leaves the state as it was and surfaces as
    /// [`SessionError::Persist`].
    pub fn dispatch(&mut self, event: FeedbackEvent) -> Result<Dispatch, SessionError> {
        match transition(&self.state, &event, &self.rules) {
            Step::Changed(next) => Ok(self.adopt(&event, next)),
            Step::Ignored { guard } => {
                debug!(session = %self.id, event = event.name(), guard, "event ignored");
                Ok(Dispatch::Ignored { guard })
            }
            Step::Rejected(violations) => {
                for violation in violations.iter() {
                    warn!(session = %self.id, %violation, "comment rejected");
                }
                Ok(Dispatch::Rejected(violations))
            }
            Step::Persist { comment } => {
                let note = futures::executor::block_on(persist_note(comment).run(&self.env))?;
                info!(
                    session = %self.id,
                    cluster = ?self.state.current_cluster_id(),
                    note_id = note.id,
                    chars = note.chars,
                    "feedback comment persisted"
                );
                let next = mark_comment_submitted(&self.state);
                self.adopt(&event, next);
                Ok(Dispatch::Persisted(note))
            }
        }
    }

    /// React to the classifier's answer for the current input record.
    pub fn assign_cluster(&mut self, id: ClusterId) -> Result<Dispatch, SessionError> {
        self.dispatch(FeedbackEvent::AssignCluster(id))
    }

    /// Put `text` in the comment box and submit it.
    pub fn submit_comment(&mut self, text: impl Into<String>) -> Result<Dispatch, SessionError> {
        match self.dispatch(FeedbackEvent::EditComment(text.into()))? {
            ignored @ Dispatch::Ignored { .. } => Ok(ignored),
            _ => self.dispatch(FeedbackEvent::SubmitComment),
        }
    }

    fn adopt(&mut self, event: &FeedbackEvent, next: SessionState) -> Dispatch {
        let from = self.state.stage();
        let to = next.stage();

        match event {
            FeedbackEvent::AssignCluster(id) => {
                info!(session = %self.id, cluster = %id, %from, %to, "cluster assigned");
            }
            FeedbackEvent::EditComment(_) => {}
            _ => info!(session = %self.id, event = event.name(), %from, %to, "feedback updated"),
        }

        self.history = self.history.record(StageChange {
            event: event.name().to_string(),
            from,
            to,
            cluster: next.current_cluster_id().cloned(),
            timestamp: Utc::now(),
        });
        self.state = next;
        Dispatch::Applied { from, to }
    }
}
