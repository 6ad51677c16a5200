//! Effects that write feedback comments to the note store.
//!
//! Ids are sequential: a note gets `count() + 1`. The count and the append are
//! two separate store calls, so two sessions persisting at the same moment can
//! compute the same id and the later append replaces the earlier note. No
//! detection or resolution is attempted.

use crate::effects::store::{NoteStore, StoreError};
use std::fmt;
use std::sync::Arc;
use stillwater::prelude::*;

/// Environment the persistence effects run against.
#[derive(Clone)]
pub struct FeedbackEnv {
    notes: Arc<dyn NoteStore>,
}

impl FeedbackEnv {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &dyn NoteStore {
        self.notes.as_ref()
    }
}

impl fmt::Debug for FeedbackEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackEnv").finish_non_exhaustive()
    }
}

/// A comment that was written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNote {
    pub id: u64,
    pub chars: usize,
}

/// Id the next note will be stored under.
pub fn next_note_id() -> impl Effect<Output = u64, Error = StoreError, Env = FeedbackEnv> {
    from_fn(|env: &FeedbackEnv| -> Result<u64, StoreError> {
        let count = env.notes().count()?;
        Ok(count + 1)
    })
}

/// Store `text` under `id`.
pub fn append_note(
    id: u64,
    text: String,
) -> impl Effect<Output = PersistedNote, Error = StoreError, Env = FeedbackEnv> {
    from_fn(move |env: &FeedbackEnv| -> Result<PersistedNote, StoreError> {
        env.notes().append(id, &text)?;
        Ok(PersistedNote {
            id,
            chars: text.chars().count(),
        })
    })
}

/// Read the note count, then append `comment` as note `count + 1`.
pub fn persist_note(
    comment: String,
) -> impl Effect<Output = PersistedNote, Error = StoreError, Env = FeedbackEnv> {
    next_note_id().and_then(move |id| append_note(id, comment))
}
