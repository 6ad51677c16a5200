//! Pure feedback state machine.
//!
//! This module contains the pure core of the dashboard session:
//! - [`SessionState`] and the stage it derives ([`FeedbackStage`])
//! - [`Guard`] predicates naming the precondition of each event
//! - the [`transition`] function and its [`Step`] result
//! - the [`project`] display projection
//! - immutable [`SessionHistory`] tracking
//!
//! Nothing here performs I/O. Persisting comments and talking to the note
//! store is left to [`effects`](crate::effects).

mod guard;
mod history;
mod session;
mod state;
mod transition;
mod view;

pub use guard::{choice_open, cluster_changes, comment_open, resettable, Guard};
pub use history::{SessionHistory, StageChange, MAX_CHANGES};
pub use session::{ClusterId, FeedbackChoice, SessionState};
pub use state::{FeedbackStage, State};
pub use transition::{mark_comment_submitted, transition, FeedbackEvent, Step};
pub use view::{project, Acknowledgement, FeedbackView};
