//! End-to-end configuration lifecycle
//!
//! Exercises the flow a lane host runs during setup: merge properties
//! files across a project and its root scope, then resolve the
//! effective version from the populated store.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use lane_config::{
    read_properties, setup, ConfigContext, ConfigError, ConfigStore, MapEnv, MemoryStore, Scope,
    Version, VersionField,
};

#[test]
fn test_full_setup_flow() {
    let root = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    fs::write(
        root.path().join("lane.properties"),
        "buildNumber=500\nregion=us-east-1\n",
    )
    .unwrap();
    fs::write(project.path().join("lane.properties"), "buildNumber=7\n").unwrap();

    let mut store = MemoryStore::new();
    let scope = Scope::with_root(project.path(), root.path());

    let report = read_properties(&mut store, &scope, "lane.properties").unwrap();
    assert_eq!(report.sources.len(), 2);

    // The project file supplied the build number; the root file only
    // filled the region gap.
    let mut field = VersionField::text("1.2");
    let version = setup(&mut field, &store, &MapEnv::new()).unwrap();

    assert_eq!(version.to_string(), "1.2.7");
    assert_eq!(version.version_code(), 2 + (1 << 24) + (2 << 16) + 7);
    assert_eq!(field, VersionField::Resolved(version));
    assert_eq!(store.get("region"), Some(json!("us-east-1")));
}

#[test]
fn test_explicit_store_config_beats_every_file() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("lane.properties"), "buildNumber=7\n").unwrap();

    let mut store = MemoryStore::new();
    store.set("buildNumber", "42");

    read_properties(&mut store, &Scope::new(project.path()), "lane.properties").unwrap();

    let mut field = VersionField::text("2.0");
    let version = setup(&mut field, &store, &MapEnv::new()).unwrap();

    assert_eq!(version.build(), 42);
}

#[test]
fn test_bare_project_resolves_to_snapshot() {
    let project = TempDir::new().unwrap();

    let mut store = MemoryStore::new();
    read_properties(&mut store, &Scope::new(project.path()), "lane.properties").unwrap();

    let mut field = VersionField::Unspecified;
    let version = setup(&mut field, &store, &MapEnv::new()).unwrap();

    assert_eq!(version, Version::snapshot());
    assert_eq!(version.version_code(), 1);
    assert_eq!(version.to_string(), "0.0-SNAPSHOT");
}

#[test]
fn test_context_drives_the_same_flow() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("lane.properties"),
        "signingKey=release-key\n",
    )
    .unwrap();

    let context = ConfigContext::with_env(
        Scope::new(project.path()),
        MapEnv::new().with_var("BUILD_NUMBER", "9"),
    );
    let mut store = MemoryStore::new();

    context
        .read_properties(&mut store, "lane.properties")
        .unwrap();
    let key = context
        .require(&store, "signingKey", "SIGNING_KEY")
        .unwrap();
    assert_eq!(key, json!("release-key"));

    let mut field = VersionField::text("1.0");
    let version = context.setup_version(&mut field, &store).unwrap();
    assert_eq!(version.to_string(), "1.0.9");

    // Re-running setup on the now-resolved field is a no-op.
    let again = context.setup_version(&mut field, &store).unwrap();
    assert_eq!(again, version);
}

#[test]
fn test_missing_required_value_is_fatal() {
    let context = ConfigContext::with_env(Scope::new("."), MapEnv::new());
    let store = MemoryStore::new();

    let err = context.require(&store, "signingKey", "SIGNING_KEY").unwrap_err();

    assert!(matches!(err, ConfigError::MissingValue { .. }));
    assert!(err.to_string().contains("signingKey"));
    assert!(err.to_string().contains("SIGNING_KEY"));
}
