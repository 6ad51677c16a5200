//! The note store contract and an in-memory implementation.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors reported by a note store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Note store request failed: {0}")]
    Transport(String),

    #[error("Note store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected note store response: {0}")]
    InvalidResponse(String),

    #[error("Note store unavailable: {0}")]
    Unavailable(String),
}

/// One stored feedback comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub text: String,
}

/// Append-only store of free-text feedback comments.
///
/// Ids are assigned by the caller. Appending an id that already exists
/// replaces the stored note, matching point upsert semantics.
pub trait NoteStore: Send + Sync {
    /// Current number of stored notes.
    fn count(&self) -> Result<u64, StoreError>;

    /// Store `text` under `id`.
    fn append(&self, id: u64, text: &str) -> Result<(), StoreError>;
}

/// Thread-safe note store held in memory.
///
/// # Example
///
/// ```rust
/// use cluster_feedback::effects::{InMemoryNoteStore, NoteStore};
///
/// let store = InMemoryNoteStore::new();
/// store.append(1, "too vague").unwrap();
/// assert_eq!(store.count().unwrap(), 1);
/// assert_eq!(store.notes()[0].text, "too vague");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored notes, in insertion order.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Note>> {
        // A panic while holding the lock cannot leave the vector half-written.
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NoteStore for InMemoryNoteStore {
    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().len() as u64)
    }

    fn append(&self, id: u64, text: &str) -> Result<(), StoreError> {
        let mut notes = self.lock();
        let note = Note {
            id,
            text: text.to_string(),
        };
        match notes.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = note,
            None => notes.push(note),
        }
        Ok(())
    }
}
