//! Host-facing configuration context
//!
//! Bundles an environment provider and a file-search scope so a host
//! can drive resolution, merging, and version setup through one
//! handle. The store stays caller-owned and is passed per call.

use serde_json::Value;

use crate::error::ConfigError;
use crate::properties::{read_properties, read_user_properties, MergeReport, Scope};
use crate::resolve::{require_value, resolve_value, Environment, ProcessEnv};
use crate::store::ConfigStore;
use crate::version::{setup, Version, VersionField};

/// One project's configuration entry point
pub struct ConfigContext {
    env: Box<dyn Environment>,
    scope: Scope,
}

impl ConfigContext {
    /// Context reading the real process environment
    pub fn new(scope: Scope) -> Self {
        Self {
            env: Box::new(ProcessEnv),
            scope,
        }
    }

    /// Context with a substitute environment provider
    pub fn with_env(scope: Scope, env: impl Environment + 'static) -> Self {
        Self {
            env: Box::new(env),
            scope,
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// See [`resolve_value`]
    pub fn resolve(
        &self,
        store: &dyn ConfigStore,
        key: &str,
        env_var: &str,
        default: Option<Value>,
    ) -> Option<Value> {
        resolve_value(store, self.env.as_ref(), key, env_var, default)
    }

    /// See [`require_value`]
    pub fn require(
        &self,
        store: &dyn ConfigStore,
        key: &str,
        env_var: &str,
    ) -> Result<Value, ConfigError> {
        require_value(store, self.env.as_ref(), key, env_var)
    }

    /// See [`read_properties`]
    pub fn read_properties(
        &self,
        store: &mut dyn ConfigStore,
        file_name: &str,
    ) -> Result<MergeReport, ConfigError> {
        read_properties(store, &self.scope, file_name)
    }

    /// See [`read_user_properties`]
    pub fn read_user_properties(
        &self,
        store: &mut dyn ConfigStore,
        file_name: &str,
    ) -> Result<MergeReport, ConfigError> {
        read_user_properties(store, file_name)
    }

    /// See [`setup`]
    pub fn setup_version(
        &self,
        field: &mut VersionField,
        store: &dyn ConfigStore,
    ) -> Result<Version, ConfigError> {
        setup(field, store, self.env.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::MapEnv;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_context_resolution_precedence() {
        let mut store = MemoryStore::new();
        store.set("region", "eu-west-1");
        let context = ConfigContext::with_env(
            Scope::new("."),
            MapEnv::new().with_var("REGION", "us-east-1"),
        );

        assert_eq!(
            context.resolve(&store, "region", "REGION", None),
            Some(json!("eu-west-1"))
        );
        assert_eq!(
            context.resolve(&store, "zone", "REGION", None),
            Some(json!("us-east-1"))
        );
    }

    #[test]
    fn test_context_require_missing() {
        let store = MemoryStore::new();
        let context = ConfigContext::with_env(Scope::new("."), MapEnv::new());

        let err = context.require(&store, "region", "REGION").unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { .. }));
    }

    #[test]
    fn test_context_version_setup() {
        let store = MemoryStore::new();
        let context = ConfigContext::with_env(
            Scope::new("."),
            MapEnv::new().with_var("BUILD_NUMBER", "7"),
        );

        let mut field = VersionField::text("1.2");
        let version = context.setup_version(&mut field, &store).unwrap();

        assert_eq!(version.to_string(), "1.2.7");
    }
}
