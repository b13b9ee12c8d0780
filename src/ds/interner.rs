//! Key interner for mapping canonical keys to compact handles.
//!
//! Replay and grouping hot paths run over `u64` handles instead of cloned
//! `String` keys: the pipeline derives each record's canonical key once,
//! interns it, and feeds handles to the simulator and collectors. Handles are
//! dense, starting at 0, assigned in first-observation order, so they double
//! as a stable "first seen" rank.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Monotonic key interner that assigns a `u64` handle to each unique key.
#[derive(Debug, Default)]
pub struct KeyInterner<K> {
    index: FxHashMap<K, u64>,
    keys: Vec<K>,
}

impl<K> KeyInterner<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Returns the handle for `key`, interning a clone if it is new.
    pub fn intern(&mut self, key: &K) -> u64 {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = self.keys.len() as u64;
        self.keys.push(key.clone());
        self.index.insert(key.clone(), id);
        id
    }

    /// Returns the handle for `key`, taking ownership if it is new.
    ///
    /// Saves a clone over [`intern`](Self::intern) on the miss path, which is
    /// the common case when feeding freshly derived keys.
    pub fn intern_owned(&mut self, key: K) -> u64 {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.keys.len() as u64;
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    /// Returns the handle for `key` if it has been interned.
    pub fn get_handle(&self, key: &K) -> Option<u64> {
        self.index.get(key).copied()
    }

    /// Resolves a handle to its key.
    pub fn resolve(&self, handle: u64) -> Option<&K> {
        self.keys.get(handle as usize)
    }

    /// Returns the number of distinct interned keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no keys are interned.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
