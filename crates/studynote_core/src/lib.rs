//! Core persistence logic for StudyNote.
//!
//! Subjects and their notes are stored as whole JSON collections in a flat
//! string-keyed preference store. Presentation layers read a collection,
//! change it in memory and write it back through the stores here.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use kv::{KvError, KvResult, MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::id::{next_id, IdGenerator};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::subject::{
    default_subjects, Subject, SubjectDraft, SubjectId, SubjectStyle, SubjectValidationError,
    QUICK_ADD_ICON,
};
pub use repo::note_repo::NoteStore;
pub use repo::subject_repo::SubjectStore;
pub use repo::{notes_key, StoreError, SUBJECTS_KEY};
pub use service::subject_service::{SubjectService, SubjectServiceError, SubjectsOverview};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
