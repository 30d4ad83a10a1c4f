//! Note domain model.
//!
//! # Invariants
//! - `id` is positive and unique within the owning subject's collection.
//! - `timestamp` is a display string produced once at creation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of one note inside its subject.
pub type NoteId = i64;

/// Display format of note timestamps (`14:05:09 19/10/2026`).
pub const NOTE_TIMESTAMP_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// Validation errors for note records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NonPositiveId(NoteId),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "note id must be positive, got {id}"),
        }
    }
}

impl Error for NoteValidationError {}

/// Free-text note attached to one subject. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteRecord")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub timestamp: String,
}

impl Note {
    /// Builds a validated note with an explicit display timestamp.
    pub fn new(
        id: NoteId,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id,
            content: content.into(),
            timestamp: timestamp.into(),
        };
        note.validate()?;
        Ok(note)
    }

    /// Builds a validated note stamped with the current local time.
    pub fn create(id: NoteId, content: impl Into<String>) -> Result<Self, NoteValidationError> {
        Self::new(id, content, format_note_timestamp(&Local::now()))
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id <= 0 {
            return Err(NoteValidationError::NonPositiveId(self.id));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct NoteRecord {
    id: NoteId,
    content: String,
    #[serde(default)]
    timestamp: String,
}

impl TryFrom<NoteRecord> for Note {
    type Error = NoteValidationError;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        Self::new(record.id, record.content, record.timestamp)
    }
}

/// Formats a note creation time for display.
pub fn format_note_timestamp(at: &DateTime<Local>) -> String {
    at.format(NOTE_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_note_timestamp, Note, NoteValidationError};
    use chrono::{Local, TimeZone};

    #[test]
    fn timestamp_uses_time_then_day_month_year() {
        let at = Local.with_ymd_and_hms(2026, 1, 5, 7, 3, 9).unwrap();
        assert_eq!(format_note_timestamp(&at), "07:03:09 05/01/2026");
    }

    #[test]
    fn create_keeps_multiline_content() {
        let note = Note::create(42, "dòng 1\ndòng 2").unwrap();
        assert_eq!(note.content, "dòng 1\ndòng 2");
        assert!(!note.timestamp.is_empty());
    }

    #[test]
    fn deserialize_rejects_non_positive_id() {
        let value = serde_json::json!({"id": -1, "content": "x", "timestamp": ""});
        let err = serde_json::from_value::<Note>(value).unwrap_err();
        assert!(err.to_string().contains("must be positive"), "{err}");
        assert_eq!(
            Note::new(0, "x", "").unwrap_err(),
            NoteValidationError::NonPositiveId(0)
        );
    }
}
