//! Process-local key-value store.
//!
//! Backs ephemeral sessions and tests. Reads and writes can be made to fail
//! on demand so callers can exercise degraded-store paths.

use super::{KeyValueStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// `HashMap`-backed store with failure injection and a write counter.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one raw value.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Makes every subsequent `get` fail until switched off.
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail until switched off.
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Number of successful `set` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw value for `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("read of `{key}` refused")));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write of `{key}` refused")));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::store::{KeyValueStore, StoreError};

    #[test]
    fn get_returns_none_for_missing_key() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("todos").unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_counts_writes() {
        let store = MemoryKvStore::new();
        store.set("todos", "[]").unwrap();
        store.set("todos", "[{}]").unwrap();

        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[{}]"));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn injected_failures_surface_as_unavailable() {
        let store = MemoryKvStore::with_entry("todos", "[]");
        store.fail_reads(true);
        store.fail_writes(true);

        assert!(matches!(
            store.get("todos").unwrap_err(),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            store.set("todos", "x").unwrap_err(),
            StoreError::Unavailable(_)
        ));
        assert_eq!(store.raw("todos").as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 0);
    }
}
