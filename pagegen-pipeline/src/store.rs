//! The two shared stores: [`AttributeStore`] (phase 1) and [`BuildStore`]
//! (phase 2).
//!
//! Each store owns its own lock. Workers get a cloned handle that points at
//! the same map, never a private copy. Callers can insert a finished value,
//! snapshot one value or list keys, nothing else. The lock is held for
//! exactly one map operation, so no caller can hold it across I/O or
//! substitution.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use pagegen_core::{AttributeMap, EntityId};

// ---------------------------------------------------------------------------
// SharedMap
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct SharedMap<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for SharedMap<K, V> {
    fn clone(&self) -> Self {
        SharedMap {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedMap<K, V> {
    fn default() -> Self {
        SharedMap {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone + Ord, V: Clone> SharedMap<K, V> {
    // A panic can only happen inside a single insert/get/clone, which leaves
    // the map consistent, so a poisoned lock is safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, key: K, value: V) -> bool {
        self.write().insert(key, value).is_some()
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().get(key).cloned()
    }

    fn sorted_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}

// ---------------------------------------------------------------------------
// AttributeStore
// ---------------------------------------------------------------------------

/// Entity ID -> that entity's finished attribute map.
///
/// Maps are inserted whole, so a reader sees either nothing or the complete
/// map for an entity. Inserting an ID twice keeps whichever insert ran last.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    map: SharedMap<EntityId, AttributeMap>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `attributes` for `entity`. Returns `true` if an earlier map for
    /// the same ID was replaced.
    pub fn insert(&self, entity: EntityId, attributes: AttributeMap) -> bool {
        self.map.insert(entity, attributes)
    }

    /// Copy of the entity's map, or `None` if it was never loaded.
    pub fn snapshot(&self, entity: &EntityId) -> Option<AttributeMap> {
        self.map.get(entity)
    }

    /// Loaded entity IDs in sorted order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.map.sorted_keys()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// BuildStore
// ---------------------------------------------------------------------------

/// Output filename (`<entity>.<ext>`) -> rendered document.
#[derive(Debug, Clone, Default)]
pub struct BuildStore {
    map: SharedMap<String, String>,
}

impl BuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rendered document. Returns `true` if one was replaced.
    pub fn insert(&self, filename: String, document: String) -> bool {
        self.map.insert(filename, document)
    }

    /// Copy of the document stored under `filename`.
    pub fn snapshot(&self, filename: &str) -> Option<String> {
        self.map.get(filename)
    }

    /// Filenames in sorted order.
    pub fn filenames(&self) -> Vec<String> {
        self.map.sorted_keys()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
