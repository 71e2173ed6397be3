// src/crawl/store.rs
// =============================================================================
// A small thread-safe key/value store that all crawl state is built on.
//
// The crawler keeps four of these:
// - to-do:        URL -> depth        (discovered, not fetched yet)
// - in-progress:  URL -> depth        (currently being fetched)
// - done:         URL -> PageRecord   (fetched, successfully or not)
// - to-save:      URL -> PageRecord   (done, but not written to the report)
//
// Every method takes the lock for exactly one operation, so each call is
// atomic on its own. Methods that hand out collections (keys, values, list)
// return copies: the caller gets a snapshot, never a live view.
//
// Rust concepts:
// - Generics: Store<V> works for depths and for page records
// - RwLock: many readers OR one writer at a time
// - Clone: snapshots copy values out of the lock
// =============================================================================

use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Errors returned by store lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no such key: {0}")]
    NotFound(String),
}

/// Concurrent string-keyed map
///
/// Backed by an `IndexMap` so snapshots come back in insertion order
/// (re-adding an existing key keeps its original slot).
#[derive(Debug)]
pub struct Store<V> {
    entries: RwLock<IndexMap<String, V>>,
}

impl<V: Clone> Store<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
        }
    }

    // A panic while holding the lock can't leave the map half-updated
    // (every write is a single IndexMap call), so a poisoned lock is
    // still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `value` under `key`, replacing any previous value
    pub fn add(&self, key: impl Into<String>, value: V) {
        self.write().insert(key.into(), value);
    }

    /// Returns a copy of the value stored under `key`
    pub fn get(&self, key: &str) -> Result<V, StoreError> {
        self.read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Removes `key`; does nothing if it isn't there
    ///
    /// The remaining entries keep their order, which makes a delete O(n):
    /// draining a to-do store of n URLs one by one costs O(n^2) moves.
    /// Snapshots (and so the order rows reach the report) depend on it.
    pub fn delete(&self, key: &str) {
        self.write().shift_remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Snapshot of the whole mapping
    pub fn list(&self) -> IndexMap<String, V> {
        self.read().clone()
    }

    /// Snapshot of all values
    pub fn values(&self) -> Vec<V> {
        self.read().values().cloned().collect()
    }

    /// Snapshot of all keys
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<V: Clone> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why std::sync::RwLock and not tokio::sync::RwLock?
//    - Every operation here is a quick in-memory map update
//    - We never hold the lock across an .await
//    - A blocking lock is cheaper and can be used from sync code too
//
// 2. What is PoisonError::into_inner?
//    - If a thread panics while holding a std lock, the lock is "poisoned"
//    - into_inner() gives us the guard anyway instead of panicking again
//
// 3. Why impl Into<String> for keys?
//    - Callers can pass either &str or String
//    - An owned String is moved in without an extra copy
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PageRecord;
    use std::sync::Arc;

    fn filled_store() -> Store<usize> {
        let store = Store::new();
        store.add("key1", 1);
        store.add("key2", 2);
        store.add("key3", 3);
        store
    }

    #[test]
    fn test_get_missing_key() {
        let store: Store<usize> = Store::new();
        assert_eq!(store.get(""), Err(StoreError::NotFound(String::new())));
    }

    #[test]
    fn test_get_existing_keys() {
        let store = filled_store();
        assert_eq!(store.get("key1"), Ok(1));
        assert_eq!(store.get("key3"), Ok(3));
    }

    #[test]
    fn test_add_overwrites() {
        let store = filled_store();
        store.add("key2", 20);
        assert_eq!(store.get("key2"), Ok(20));
        assert_eq!(store.len(), 3);
        // Overwriting keeps the original position
        assert_eq!(store.keys(), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_delete() {
        let store = filled_store();
        store.delete("key2");
        assert_eq!(store.len(), 2);
        assert!(store.get("key2").is_err());
        assert_eq!(store.keys(), vec!["key1", "key3"]);

        store.delete("unknown key");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_empty_store() {
        let store: Store<usize> = Store::new();
        assert!(store.list().is_empty());
        assert!(store.keys().is_empty());
        assert!(store.values().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let store = filled_store();
        let keys = store.keys();
        let list = store.list();

        store.add("key4", 4);
        store.delete("key1");

        assert_eq!(keys, vec!["key1", "key2", "key3"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get("key1"), Some(&1));
        assert_eq!(store.values(), vec![2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let store = filled_store();
        store.clear();
        assert_eq!(store.len(), 0);
        assert!(!store.contains("key1"));
    }

    #[test]
    fn test_stores_page_records() {
        let store = Store::new();
        let record = PageRecord {
            url: "https://example.com/path1".to_string(),
            status_code: 200,
            title: "title1".to_string(),
            description: "desc1".to_string(),
            keywords: "key1, key2".to_string(),
        };
        store.add(record.url.clone(), record.clone());
        assert_eq!(store.get("https://example.com/path1"), Ok(record));
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(Store::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("{}-{}", t, i);
                        store.add(key.clone(), i);
                        if i % 2 == 0 {
                            store.delete(&key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8 * 50);
    }
}
