//! Cluster feedback: the feedback state machine of a survey-cluster dashboard
//!
//! A respondent fills in a short survey, a classifier places them in a
//! cluster, and the dashboard asks whether the cluster description fits. If
//! it does not, the respondent may leave one free-text comment, which is
//! appended to a note store.
//!
//! The crate follows a "pure core, imperative shell" split. The feedback
//! state and its transitions are pure functions with no side effects, while
//! persistence is isolated in Stillwater effects run by the shell.
//!
//! # Core Concepts
//!
//! - **Session state**: the cluster, choice and comment flags of one session
//! - **Transitions**: a pure function from state and event to the next step
//! - **Guards**: named predicates that decide whether an event applies
//! - **Effects**: note store access kept outside the core
//! - **Survey data**: catalog, population, classifier and histograms shown
//!   around the feedback widget
//!
//! # Example
//!
//! ```rust
//! use cluster_feedback::core::{transition, ClusterId, FeedbackEvent, FeedbackStage, SessionState, Step};
//! use cluster_feedback::validation::CommentRules;
//!
//! let rules = CommentRules::new();
//! let state = SessionState::new();
//!
//! let Step::Changed(state) = transition(&state, &FeedbackEvent::AssignCluster(ClusterId::from("Cluster 0")), &rules) else {
//!     panic!("assignment applies to a fresh session");
//! };
//! let Step::Changed(state) = transition(&state, &FeedbackEvent::ChooseMatches, &rules) else {
//!     panic!("choice is open");
//! };
//!
//! assert_eq!(state.stage(), FeedbackStage::Agreed);
//! assert!(matches!(
//!     transition(&state, &FeedbackEvent::ChooseDoesNotMatch, &rules),
//!     Step::Ignored { guard: "choice_open" }
//! ));
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod core;
pub mod effects;
pub mod qdrant;
pub mod survey;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{
    transition, ClusterId, FeedbackChoice, FeedbackEvent, FeedbackStage, FeedbackView,
    SessionState, State, Step,
};
pub use effects::{Dispatch, FeedbackEnv, InMemoryNoteStore, NoteStore, Session, SessionError};
pub use validation::{CommentRules, CommentViolation};
