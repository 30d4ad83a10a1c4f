//! Subject collection store.
//!
//! # Responsibility
//! - Load the subject collection with starter-set fallback.
//! - Replace the whole collection on save.
//! - Look subjects up by id.
//!
//! # Invariants
//! - `load` never fails: absent, unparsable or unreadable data yields
//!   `default_subjects()`.
//! - `save` reports failure as `false` and leaves prior state untouched.
//!   A collection holding an invalid record is never written.
//! - Collection order is display order and is preserved byte-for-byte.

use crate::kv::PreferenceStore;
use crate::model::subject::{default_subjects, Subject, SubjectId};
use crate::repo::{StoreError, SUBJECTS_KEY};
use log::{debug, error, warn};

/// Store owning the `subjects_list` key.
pub struct SubjectStore<S: PreferenceStore> {
    kv: S,
}

impl<S: PreferenceStore> SubjectStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns persisted subjects, or the starter set when none are usable.
    pub fn load(&self) -> Vec<Subject> {
        match self.read() {
            Ok(Some(subjects)) => subjects,
            Ok(None) => {
                debug!("event=subjects_load module=repo status=fallback reason=absent");
                default_subjects()
            }
            Err(err) => {
                warn!(
                    "event=subjects_load module=repo status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                default_subjects()
            }
        }
    }

    /// Overwrites the persisted collection. Returns `false` on failure.
    pub fn save(&self, subjects: &[Subject]) -> bool {
        match self.write(subjects) {
            Ok(()) => {
                debug!(
                    "event=subjects_save module=repo status=ok count={}",
                    subjects.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=subjects_save module=repo status=error error_code={} error={}",
                    err.code(),
                    err
                );
                false
            }
        }
    }

    /// Loads the collection and scans it for `id`.
    pub fn get_by_id(&self, id: SubjectId) -> Option<Subject> {
        self.load().into_iter().find(|subject| subject.id == id)
    }

    /// Reads the collection without the starter-set fallback.
    ///
    /// `Ok(None)` means nothing usable was ever saved. Callers that delete
    /// data based on the collection must use this instead of `load`.
    pub fn try_load(&self) -> Result<Option<Vec<Subject>>, StoreError> {
        self.read()
    }

    fn read(&self) -> Result<Option<Vec<Subject>>, StoreError> {
        match self.kv.get(SUBJECTS_KEY)? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    fn write(&self, subjects: &[Subject]) -> Result<(), StoreError> {
        for subject in subjects {
            subject.validate()?;
        }
        let payload = serde_json::to_string(subjects)?;
        self.kv.set(SUBJECTS_KEY, &payload)?;
        Ok(())
    }
}
