//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate subject and note stores into use-case level APIs.
//! - Own cross-collection invariants the stores do not enforce.

pub mod subject_service;
