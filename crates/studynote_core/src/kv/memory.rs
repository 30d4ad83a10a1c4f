//! In-memory preference store.
//!
//! Stands in for the platform store in tests. Read and write failures can be
//! switched on to exercise the fallback paths of the stores.

use crate::kv::{KvError, KvResult, PreferenceStore};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded `BTreeMap` implementing [`PreferenceStore`].
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `get`/`keys` call fail until reset.
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes every following `set`/`remove` call fail until reset.
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Returns the raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|entries| entries.get(key).cloned())
    }

    /// Stores a raw value, bypassing failure injection.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.lock() {
            entries.insert(key.into(), value.into());
        }
    }

    /// Number of stored keys. A poisoned lock is reported, not read as empty.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> KvResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_reads(&self) -> KvResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.check_reads()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.check_writes()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.check_writes()?;
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> KvResult<Vec<String>> {
        self.check_reads()?;
        Ok(self.lock()?.keys().cloned().collect())
    }
}
