//! Subject and note stores over a preference backend.
//!
//! # Responsibility
//! - Map subject and note collections to their preference keys.
//! - Serialize whole collections to JSON on every write.
//! - Degrade storage failures into safe defaults plus a log line.
//!
//! # Invariants
//! - Every mutation rewrites the entire collection under its key.
//! - Store operations degrade storage errors instead of returning them;
//!   only the strict `SubjectStore::try_load` reports them.
//! - Records are validated before they are written, so every saved
//!   collection loads back.
//! - Stores do not enforce the subject -> notes cascade; the subject service
//!   does.

use crate::kv::KvError;
use crate::model::note::NoteValidationError;
use crate::model::subject::{SubjectId, SubjectValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;
pub mod subject_repo;

/// Preference key holding the subject collection.
pub const SUBJECTS_KEY: &str = "subjects_list";

const NOTES_KEY_PREFIX: &str = "notes_";

static NOTES_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^notes_(-?[0-9]+)$").expect("valid notes key regex"));

/// Returns the preference key holding notes of `subject_id`.
pub fn notes_key(subject_id: SubjectId) -> String {
    format!("{NOTES_KEY_PREFIX}{subject_id}")
}

/// Extracts the subject id from a notes key, if `key` is one.
pub fn parse_notes_key(key: &str) -> Option<SubjectId> {
    NOTES_KEY_RE
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Failure inside a store operation, logged and then degraded.
#[derive(Debug)]
pub enum StoreError {
    Kv(KvError),
    Json(serde_json::Error),
    /// A record handed to `save` would not load back.
    InvalidSubject(SubjectValidationError),
    InvalidNote(NoteValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid json payload: {err}"),
            Self::InvalidSubject(err) => write!(f, "invalid subject record: {err}"),
            Self::InvalidNote(err) => write!(f, "invalid note record: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidSubject(err) => Some(err),
            Self::InvalidNote(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<SubjectValidationError> for StoreError {
    fn from(value: SubjectValidationError) -> Self {
        Self::InvalidSubject(value)
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidNote(value)
    }
}

impl StoreError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Kv(_) => "storage_unavailable",
            Self::Json(_) => "invalid_payload",
            Self::InvalidSubject(_) | Self::InvalidNote(_) => "invalid_record",
        }
    }
}
