//! Domain model for subjects and their notes.
//!
//! # Responsibility
//! - Define the records persisted under the preference store keys.
//! - Validate required fields at construction and deserialization time.
//!
//! # Invariants
//! - Every record carries a positive integer id.
//! - A subject id is unique within the subject collection; a note id is
//!   unique within its owning subject's note collection.

pub mod id;
pub mod note;
pub mod subject;
