//! Subject use-case service.
//!
//! # Responsibility
//! - Provide add/quick-add/edit/delete flows over the subject collection.
//! - Keep notes consistent with subjects (cascade delete, orphan sweep).
//! - Aggregate note counts for overview screens.
//!
//! # Invariants
//! - Every mutation is read-modify-write of the whole subject collection.
//! - New subjects get a fresh id not present in the loaded collection.
//! - Edits never change `id` or `created_at`.
//! - A deleted subject's notes key is removed after the subject list is saved.

use crate::kv::{KvError, PreferenceStore};
use crate::model::id::next_unique_id;
use crate::model::subject::{
    Subject, SubjectDraft, SubjectId, SubjectStyle, SubjectValidationError, QUICK_ADD_ICON,
};
use crate::repo::note_repo::NoteStore;
use crate::repo::{parse_notes_key, StoreError};
use crate::repo::subject_repo::SubjectStore;
use chrono::Utc;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for subject use-cases.
#[derive(Debug)]
pub enum SubjectServiceError {
    /// Draft fields violate subject invariants.
    Validation(SubjectValidationError),
    /// Target subject does not exist.
    NotFound(SubjectId),
    /// The subject collection could not be written.
    SaveFailed,
    /// The backend failed in a call the service cannot degrade.
    Backend(KvError),
    /// The persisted subject collection could not be read as-is.
    Collection(StoreError),
}

impl Display for SubjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subject not found: {id}"),
            Self::SaveFailed => write!(f, "failed to save subjects"),
            Self::Backend(err) => write!(f, "{err}"),
            Self::Collection(err) => write!(f, "subject collection unusable: {err}"),
        }
    }
}

impl Error for SubjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Backend(err) => Some(err),
            Self::Collection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SubjectValidationError> for SubjectServiceError {
    fn from(value: SubjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for SubjectServiceError {
    fn from(value: KvError) -> Self {
        Self::Backend(value)
    }
}

/// Aggregate figures shown above the subject list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectsOverview {
    pub subject_count: usize,
    pub total_notes: usize,
    /// Rounded half up; `0` when there are no subjects.
    pub average_notes_per_subject: usize,
}

/// Orchestrates subject and note stores sharing one backend.
pub struct SubjectService<'kv, S: PreferenceStore + ?Sized> {
    kv: &'kv S,
    subjects: SubjectStore<&'kv S>,
    notes: NoteStore<&'kv S>,
}

impl<'kv, S: PreferenceStore + ?Sized> SubjectService<'kv, S> {
    pub fn new(kv: &'kv S) -> Self {
        Self {
            kv,
            subjects: SubjectStore::new(kv),
            notes: NoteStore::new(kv),
        }
    }

    /// Note store bound to the same backend.
    pub fn notes(&self) -> &NoteStore<&'kv S> {
        &self.notes
    }

    /// Subject store bound to the same backend.
    pub fn subjects(&self) -> &SubjectStore<&'kv S> {
        &self.subjects
    }

    /// Lists subjects in display order.
    pub fn list_subjects(&self) -> Vec<Subject> {
        self.subjects.load()
    }

    pub fn get_subject(&self, id: SubjectId) -> Option<Subject> {
        self.subjects.get_by_id(id)
    }

    /// Creates a subject from full draft fields and appends it.
    pub fn add_subject(&self, draft: SubjectDraft) -> Result<Subject, SubjectServiceError> {
        let mut subjects = self.subjects.load();
        let id = next_unique_id(|candidate| subjects.iter().any(|s| s.id == candidate));
        let subject = Subject::new(id, draft, Some(Utc::now()))?;

        subjects.push(subject.clone());
        if !self.subjects.save(&subjects) {
            return Err(SubjectServiceError::SaveFailed);
        }

        info!(
            "event=subject_add module=service status=ok subject_id={} count={}",
            subject.id,
            subjects.len()
        );
        Ok(subject)
    }

    /// Creates a subject from a name alone.
    ///
    /// Uses the quick-add icon and an empty description; the caller picks
    /// the style.
    pub fn quick_add_subject(
        &self,
        name: &str,
        style: SubjectStyle,
    ) -> Result<Subject, SubjectServiceError> {
        self.add_subject(SubjectDraft {
            name: name.to_string(),
            icon: QUICK_ADD_ICON.to_string(),
            gradient: style.gradient,
            shadow: style.shadow,
            description: String::new(),
        })
    }

    /// Replaces all editable fields of subject `id`.
    pub fn edit_subject(
        &self,
        id: SubjectId,
        draft: SubjectDraft,
    ) -> Result<Subject, SubjectServiceError> {
        let mut subjects = self.subjects.load();
        let target = subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SubjectServiceError::NotFound(id))?;
        target.apply_draft(draft)?;
        let edited = target.clone();

        if !self.subjects.save(&subjects) {
            return Err(SubjectServiceError::SaveFailed);
        }

        info!("event=subject_edit module=service status=ok subject_id={id}");
        Ok(edited)
    }

    /// Removes subject `id` and then its notes.
    ///
    /// Notes are kept when the subject list cannot be saved, so a failed
    /// delete leaves both sides intact.
    pub fn delete_subject(&self, id: SubjectId) -> Result<(), SubjectServiceError> {
        let mut subjects = self.subjects.load();
        let before = subjects.len();
        subjects.retain(|s| s.id != id);
        if subjects.len() == before {
            return Err(SubjectServiceError::NotFound(id));
        }

        if !self.subjects.save(&subjects) {
            return Err(SubjectServiceError::SaveFailed);
        }
        self.notes.clear(id);

        info!(
            "event=subject_delete module=service status=ok subject_id={} count={}",
            id,
            subjects.len()
        );
        Ok(())
    }

    /// Returns the note count of every listed subject.
    pub fn note_counts(&self) -> BTreeMap<SubjectId, usize> {
        self.subjects
            .load()
            .iter()
            .map(|s| (s.id, self.notes.count(s.id)))
            .collect()
    }

    pub fn overview(&self) -> SubjectsOverview {
        let counts = self.note_counts();
        let subject_count = counts.len();
        let total_notes: usize = counts.values().sum();
        let average_notes_per_subject = if subject_count == 0 {
            0
        } else {
            (2 * total_notes + subject_count) / (2 * subject_count)
        };

        SubjectsOverview {
            subject_count,
            total_notes,
            average_notes_per_subject,
        }
    }

    /// Deletes notes keys whose subject is no longer listed.
    ///
    /// Returns the number of removed keys. Only a persisted, readable subject
    /// collection is trusted: nothing is removed while the collection was
    /// never saved, and an unreadable or unparsable one is an error.
    pub fn purge_orphaned_notes(&self) -> Result<usize, SubjectServiceError> {
        let subjects = match self.subjects.try_load() {
            Ok(Some(subjects)) => subjects,
            Ok(None) => {
                info!("event=notes_purge module=service status=skipped reason=subjects_absent");
                return Ok(0);
            }
            Err(err) => {
                warn!(
                    "event=notes_purge module=service status=refused error_code={} error={}",
                    err.code(),
                    err
                );
                return Err(SubjectServiceError::Collection(err));
            }
        };
        let live: BTreeSet<SubjectId> = subjects.iter().map(|s| s.id).collect();
        let mut removed = 0;
        for key in self.kv.keys()? {
            let Some(subject_id) = parse_notes_key(&key) else {
                continue;
            };
            if live.contains(&subject_id) {
                continue;
            }
            match self.kv.remove(&key) {
                Ok(()) => removed += 1,
                Err(err) => warn!(
                    "event=notes_purge module=service status=error subject_id={subject_id} error={err}"
                ),
            }
        }

        info!("event=notes_purge module=service status=ok removed={removed}");
        Ok(removed)
    }
}
