//! Project configuration store abstraction
//!
//! The lane never owns the project's configuration surface; it reads
//! and writes through [`ConfigStore`]. Values are heterogeneous
//! (`serde_json::Value`): strings from the environment or properties
//! files sit next to whatever the host configured natively.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A project's key-value configuration surface.
///
/// A key that is present with an empty or null value still counts as
/// present; only `has_key == false` lets lower-precedence sources in.
pub trait ConfigStore {
    /// Returns whether the key is present
    fn has_key(&self, key: &str) -> bool;

    /// Returns the value for the key, if present
    fn get(&self, key: &str) -> Option<Value>;

    /// Sets the key only if it is not already present
    fn set_if_absent(&mut self, key: &str, value: Value);
}

/// In-memory store for hosts and tests
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally sets a key. This is explicit host configuration,
    /// which wins over every other source.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set_if_absent(&mut self, key: &str, value: Value) {
        self.entries.entry(key.to_string()).or_insert(value);
    }
}
