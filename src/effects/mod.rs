//! The imperative shell around the pure feedback core.
//!
//! # Key Concepts
//!
//! - **Note store**: the [`NoteStore`] contract, with an in-memory store for
//!   tests and offline runs (a Qdrant-backed one lives in [`crate::qdrant`])
//! - **Persistence**: Stillwater effects over [`FeedbackEnv`] that assign the
//!   next note id and append the comment
//! - **Session**: [`Session`] threads one [`SessionState`](crate::core::SessionState)
//!   through [`transition`](crate::core::transition) and runs the effects the
//!   core asks for

mod persist;
mod session;
mod store;

pub use persist::{append_note, next_note_id, persist_note, FeedbackEnv, PersistedNote};
pub use session::{Dispatch, Session, SessionError};
pub use store::{InMemoryNoteStore, Note, NoteStore, StoreError};
