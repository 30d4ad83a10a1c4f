//! Subject domain model.
//!
//! # Responsibility
//! - Define the subject record persisted under `subjects_list`.
//! - Provide the built-in starter subjects shown before the first save.
//!
//! # Invariants
//! - `id` is positive and never changes after creation.
//! - `name` is non-empty after trimming.
//! - `created_at` is set once at creation and survives edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of one subject.
pub type SubjectId = i64;

/// Icon assigned to subjects created through quick-add.
pub const QUICK_ADD_ICON: &str = "📚";

/// Validation errors for subject records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectValidationError {
    NonPositiveId(SubjectId),
    EmptyName,
}

impl Display for SubjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "subject id must be positive, got {id}"),
            Self::EmptyName => write!(f, "subject name cannot be empty"),
        }
    }
}

impl Error for SubjectValidationError {}

/// Caller-supplied subject fields for add and edit flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDraft {
    pub name: String,
    pub icon: String,
    pub gradient: String,
    pub shadow: String,
    pub description: String,
}

/// Opaque gradient/shadow identifier pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectStyle {
    pub gradient: String,
    pub shadow: String,
}

impl SubjectStyle {
    pub fn new(gradient: impl Into<String>, shadow: impl Into<String>) -> Self {
        Self {
            gradient: gradient.into(),
            shadow: shadow.into(),
        }
    }
}

/// One subject (course) owning a note collection.
///
/// Serialized with camelCase field names to stay readable by existing
/// `subjects_list` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SubjectRecord")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub icon: String,
    pub gradient: String,
    pub shadow: String,
    pub description: String,
    /// Absent for the built-in starter subjects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// Builds a validated subject from draft fields.
    ///
    /// The name is trimmed before validation and storage.
    pub fn new(
        id: SubjectId,
        draft: SubjectDraft,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SubjectValidationError> {
        let subject = Self {
            id,
            name: draft.name.trim().to_string(),
            icon: draft.icon,
            gradient: draft.gradient,
            shadow: draft.shadow,
            description: draft.description,
            created_at,
        };
        subject.validate()?;
        Ok(subject)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), SubjectValidationError> {
        if self.id <= 0 {
            return Err(SubjectValidationError::NonPositiveId(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(SubjectValidationError::EmptyName);
        }
        Ok(())
    }

    /// Replaces every editable field, keeping `id` and `created_at`.
    pub fn apply_draft(&mut self, draft: SubjectDraft) -> Result<(), SubjectValidationError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(SubjectValidationError::EmptyName);
        }
        self.name = name;
        self.icon = draft.icon;
        self.gradient = draft.gradient;
        self.shadow = draft.shadow;
        self.description = draft.description;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectRecord {
    id: SubjectId,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    gradient: String,
    #[serde(default)]
    shadow: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubjectRecord> for Subject {
    type Error = SubjectValidationError;

    fn try_from(record: SubjectRecord) -> Result<Self, Self::Error> {
        let subject = Self {
            id: record.id,
            name: record.name,
            icon: record.icon,
            gradient: record.gradient,
            shadow: record.shadow,
            description: record.description,
            created_at: record.created_at,
        };
        subject.validate()?;
        Ok(subject)
    }
}

/// Returns the starter subjects used until the first successful save.
pub fn default_subjects() -> Vec<Subject> {
    [
        (1, "Toán", "📐", "from-blue-400 to-blue-600", "shadow-blue-500/50", "Đại số & Hình học"),
        (2, "Lý", "⚛️", "from-purple-400 to-purple-600", "shadow-purple-500/50", "Vật lý & Cơ học"),
        (3, "Anh", "🇬🇧", "from-red-400 to-red-600", "shadow-red-500/50", "Tiếng Anh"),
        (4, "CNTT", "💻", "from-green-400 to-green-600", "shadow-green-500/50", "Tin học & Lập trình"),
        (5, "Văn", "📚", "from-yellow-400 to-orange-500", "shadow-yellow-500/50", "Ngữ văn"),
        (6, "Hóa", "🧪", "from-pink-400 to-pink-600", "shadow-pink-500/50", "Hóa học"),
    ]
    .into_iter()
    .map(|(id, name, icon, gradient, shadow, description)| Subject {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        gradient: gradient.to_string(),
        shadow: shadow.to_string(),
        description: description.to_string(),
        created_at: None,
    })
    .collect()
}
