//! Key-value preference store contract and backends.
//!
//! # Responsibility
//! - Define the `get/set/remove` contract the subject and note stores consume.
//! - Provide an in-memory backend for tests and a SQLite backend for apps.
//!
//! # Invariants
//! - Keys and values are plain UTF-8 strings; values hold JSON payloads.
//! - `set` overwrites the whole value for a key; there are no partial writes.
//! - Every call may fail; callers decide how failures degrade.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

pub type KvResult<T> = Result<T, KvError>;

/// Errors raised by preference store backends.
#[derive(Debug)]
pub enum KvError {
    /// SQLite backend failure.
    Db(DbError),
    /// Backend cannot serve the call right now.
    Unavailable(String),
    /// Backend connection lacks the `preferences` table.
    MissingRequiredTable(&'static str),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "preference store unavailable: {reason}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Flat string-keyed preference storage.
pub trait PreferenceStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> KvResult<()>;
    /// Returns all stored keys in ascending order.
    fn keys(&self) -> KvResult<Vec<String>>;

    /// Returns whether `key` currently holds a value.
    fn contains_key(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        (**self).keys()
    }

    fn contains_key(&self, key: &str) -> KvResult<bool> {
        (**self).contains_key(key)
    }
}
