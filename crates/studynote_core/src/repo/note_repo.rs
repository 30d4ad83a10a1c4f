//! Per-subject note collection store.
//!
//! # Responsibility
//! - Load, overwrite, append to, filter and clear the notes of one subject.
//! - Keep notes newest-first.
//!
//! # Invariants
//! - Notes of a subject live under `notes_<subject_id>`.
//! - `load` never fails: absent, unparsable or unreadable data yields `[]`.
//! - `clear` deletes the key instead of writing an empty array.
//! - Note ids are unique within one subject's collection.
//! - A collection holding an invalid record is never written.

use crate::kv::PreferenceStore;
use crate::model::id::next_unique_id;
use crate::model::note::{Note, NoteId};
use crate::model::subject::SubjectId;
use crate::repo::{notes_key, StoreError};
use log::{debug, error, warn};

/// Store owning every `notes_<subject_id>` key.
pub struct NoteStore<S: PreferenceStore> {
    kv: S,
}

impl<S: PreferenceStore> NoteStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the notes of `subject_id`, newest first, or `[]`.
    pub fn load(&self, subject_id: SubjectId) -> Vec<Note> {
        match self.read(subject_id) {
            Ok(notes) => notes,
            Err(err) => {
                warn!(
                    "event=notes_load module=repo status=fallback subject_id={} error_code={} error={}",
                    subject_id,
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the notes of `subject_id`. Failures are only logged.
    pub fn save(&self, subject_id: SubjectId, notes: &[Note]) {
        let _ = self.try_save(subject_id, notes);
    }

    /// Creates a note from `content`, puts it first and persists.
    ///
    /// Whitespace-only content is ignored and the current notes are
    /// returned unchanged.
    pub fn append(&self, subject_id: SubjectId, content: &str) -> Vec<Note> {
        let mut notes = self.load(subject_id);
        if content.trim().is_empty() {
            debug!("event=note_append module=repo status=skipped subject_id={subject_id} reason=blank");
            return notes;
        }

        let id = next_unique_id(|candidate| notes.iter().any(|note| note.id == candidate));
        let note = match Note::create(id, content) {
            Ok(note) => note,
            Err(err) => {
                error!("event=note_append module=repo status=error subject_id={subject_id} error={err}");
                return notes;
            }
        };
        notes.insert(0, note);
        self.save(subject_id, &notes);
        notes
    }

    /// Drops the note `note_id` and persists the rest. Idempotent.
    pub fn remove(&self, subject_id: SubjectId, note_id: NoteId) -> Vec<Note> {
        let mut notes = self.load(subject_id);
        let before = notes.len();
        notes.retain(|note| note.id != note_id);
        if notes.len() != before {
            self.save(subject_id, &notes);
        }
        notes
    }

    /// Deletes the notes key of `subject_id` entirely.
    pub fn clear(&self, subject_id: SubjectId) {
        let key = notes_key(subject_id);
        match self.kv.remove(&key) {
            Ok(()) => debug!("event=notes_clear module=repo status=ok subject_id={subject_id}"),
            Err(err) => error!(
                "event=notes_clear module=repo status=error subject_id={subject_id} error={err}"
            ),
        }
    }

    /// Returns whether a notes key exists for `subject_id`.
    ///
    /// Distinguishes "cleared" from "present but empty". Backend failures
    /// read as absent.
    pub fn exists(&self, subject_id: SubjectId) -> bool {
        self.kv
            .contains_key(&notes_key(subject_id))
            .unwrap_or_else(|err| {
                warn!(
                    "event=notes_exists module=repo status=fallback subject_id={subject_id} error={err}"
                );
                false
            })
    }

    /// Number of notes stored for `subject_id`.
    pub fn count(&self, subject_id: SubjectId) -> usize {
        self.load(subject_id).len()
    }

    fn try_save(&self, subject_id: SubjectId, notes: &[Note]) -> Result<(), StoreError> {
        let result = notes
            .iter()
            .try_for_each(Note::validate)
            .map_err(StoreError::from)
            .and_then(|()| Ok(serde_json::to_string(notes)?))
            .and_then(|payload| Ok(self.kv.set(&notes_key(subject_id), &payload)?));
        match &result {
            Ok(()) => debug!(
                "event=notes_save module=repo status=ok subject_id={} count={}",
                subject_id,
                notes.len()
            ),
            Err(err) => error!(
                "event=notes_save module=repo status=error subject_id={} error_code={} error={}",
                subject_id,
                err.code(),
                err
            ),
        }
        result
    }

    fn read(&self, subject_id: SubjectId) -> Result<Vec<Note>, StoreError> {
        match self.kv.get(&notes_key(subject_id))? {
            Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }
}
