//! Gap-fill merging of properties files into a project store
//!
//! A properties file never overrides anything: the store wins every
//! tie, and when both a local and a root file are in scope the local
//! file is merged first so its values win ties for keys present in
//! both. A missing file is the expected no-override case and is
//! skipped silently.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::store::ConfigStore;

use super::parse::{decode_latin1, parse};

/// File-search scope for a project: its own directory plus an optional
/// distinct root/parent directory whose file can inject defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub dir: PathBuf,
    pub root_dir: Option<PathBuf>,
}

impl Scope {
    /// Scope without a parent; only the local file is considered.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            root_dir: None,
        }
    }

    /// Scope with a distinct root directory merged after the local one.
    pub fn with_root(dir: impl Into<PathBuf>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            root_dir: Some(root_dir.into()),
        }
    }
}

/// Where a merged properties file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOrigin {
    Local,
    Root,
    User,
}

/// A properties file that was actually merged
#[derive(Debug, Clone, Serialize)]
pub struct MergeSource {
    /// Search root the file was found under
    pub origin: MergeOrigin,

    /// File path
    pub path: String,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,

    /// Keys inserted into the store
    pub inserted: usize,

    /// Keys skipped because the store already had them
    pub skipped: usize,
}

/// Provenance of one merge call
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// When this merge ran
    pub created_at: DateTime<Utc>,

    /// Contributing files in merge order; missing files do not appear
    pub sources: Vec<MergeSource>,
}

/// Merges the named properties file into the store.
///
/// The file is searched under `scope.dir` first and, when a distinct
/// root directory is set, under it second. Both passes target the same
/// store and only fill gaps, so explicit store values win over any
/// file and the local file wins ties against the root file.
pub fn read_properties(
    store: &mut dyn ConfigStore,
    scope: &Scope,
    file_name: &str,
) -> Result<MergeReport, ConfigError> {
    let mut sources = Vec::new();

    if let Some(source) = merge_file(store, &scope.dir.join(file_name), MergeOrigin::Local)? {
        sources.push(source);
    }

    if let Some(root_dir) = &scope.root_dir {
        if root_dir != &scope.dir {
            if let Some(source) = merge_file(store, &root_dir.join(file_name), MergeOrigin::Root)? {
                sources.push(source);
            }
        }
    }

    Ok(MergeReport {
        created_at: Utc::now(),
        sources,
    })
}

/// Merges the named properties file from the user's home directory.
pub fn read_user_properties(
    store: &mut dyn ConfigStore,
    file_name: &str,
) -> Result<MergeReport, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;

    let mut sources = Vec::new();
    if let Some(source) = merge_file(store, &home.join(file_name), MergeOrigin::User)? {
        sources.push(source);
    }

    Ok(MergeReport {
        created_at: Utc::now(),
        sources,
    })
}

/// Reads, parses, and merges a single file. Returns `None` when the
/// path is not a regular file.
fn merge_file(
    store: &mut dyn ConfigStore,
    path: &Path,
    origin: MergeOrigin,
) -> Result<Option<MergeSource>, ConfigError> {
    if !path.is_file() {
        debug!(path = %path.display(), "properties file not found, ignoring");
        return Ok(None);
    }

    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = hex::encode(Sha256::digest(&bytes));
    let entries = parse(&decode_latin1(&bytes)).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), entries = entries.len(), "parsing properties");

    let mut inserted = 0;
    let mut skipped = 0;
    for (key, value) in entries {
        if store.has_key(&key) {
            skipped += 1;
            continue;
        }
        store.set_if_absent(&key, Value::String(value));
        inserted += 1;
    }

    Ok(Some(MergeSource {
        origin,
        path: path.display().to_string(),
        digest,
        inserted,
        skipped,
    }))
}
