//! # In-Memory Collections
//!
//! [`Store`] is the thread-safe keyed collection backing both entity types.
//! Reads are served from here; the database, when configured, is written
//! through before the in-memory copy changes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe, cloneable in-memory keyed store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across an `.await`.
/// Clones share the same underlying map.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K, T> Store<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by key.
    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place under the write lock. Returns the updated
    /// record, or `None` if not found.
    pub fn update(&self, id: &K, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Remove a record by key.
    pub fn remove(&self, id: &K) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &K) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, T> Default for Store<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
