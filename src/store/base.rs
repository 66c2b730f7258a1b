//! Base store implementation
//!
//! HashMap-backed terminal authority for committed values.

use std::collections::HashMap;

/// Committed key-value state
#[derive(Debug, Default, Clone)]
pub struct BaseStore {
    entries: HashMap<String, i64>,
}

impl BaseStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value
    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        self.entries.insert(key.into(), value);
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.get(key).copied()
    }

    /// Remove a key; absent keys are a no-op
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, sorted by key
    pub fn sorted_entries(&self) -> Vec<(String, i64)> {
        let mut entries: Vec<(String, i64)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
