//! Layered value resolution
//!
//! A named value is looked up across sources with fixed precedence:
//! project store, then process environment, then a caller-supplied
//! default. The environment is injected behind the [`Environment`]
//! trait so tests can substitute deterministic values.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ConfigError;
use crate::store::ConfigStore;

/// Process-environment lookup seam
pub trait Environment {
    /// Returns the value of the named variable, if set
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        // Non-unicode values count as absent.
        std::env::var(name).ok()
    }
}

/// Deterministic map-backed environment for tests and hermetic hosts
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Resolves a value by precedence: store, then environment, then default.
///
/// A store value wins unconditionally, whatever its type; a present but
/// empty value does not fall through. `key` and `env_var` are taken
/// literally, empty strings included. Pure lookup, no side effects.
pub fn resolve_value(
    store: &dyn ConfigStore,
    env: &dyn Environment,
    key: &str,
    env_var: &str,
    default: Option<Value>,
) -> Option<Value> {
    if store.has_key(key) {
        return store.get(key);
    }

    if let Some(value) = env.var(env_var) {
        return Some(Value::String(value));
    }

    default
}

/// Resolves a value that must exist in the store or the environment.
///
/// Fails with [`ConfigError::MissingValue`] naming both lookups when
/// neither source has it.
pub fn require_value(
    store: &dyn ConfigStore,
    env: &dyn Environment,
    key: &str,
    env_var: &str,
) -> Result<Value, ConfigError> {
    resolve_value(store, env, key, env_var, None).ok_or_else(|| ConfigError::MissingValue {
        key: key.to_string(),
        env_var: env_var.to_string(),
    })
}
