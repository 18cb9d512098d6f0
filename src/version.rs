//! Project version parsing and version-code packing
//!
//! A lane version is `MAJOR.MINOR` plus an externally supplied build
//! number, packed into a single integer whose ordinary integer order
//! matches lexicographic `(major, minor, build)` order. Build number
//! `-1` marks a snapshot build, which gets a reserved low code.

use std::fmt;

use regex_lite::Regex;
use serde_json::Value;

use crate::error::ConfigError;
use crate::resolve::{resolve_value, Environment};
use crate::store::ConfigStore;

/// Store key holding an externally supplied build number
pub const BUILD_NUMBER_PROPERTY: &str = "buildNumber";

/// Environment variable holding an externally supplied build number
pub const BUILD_NUMBER_ENV: &str = "BUILD_NUMBER";

/// Placeholder a host uses for a project without a declared version
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Inclusive upper bound for the major component (7 bits)
pub const MAJOR_MAX: i32 = 127;

/// Inclusive upper bound for the minor component (8 bits)
pub const MINOR_MAX: i32 = 255;

/// Inclusive upper bound for the build component. One less than the
/// 16-bit field maximum so that `build + 2` always stays inside the
/// field.
pub const BUILD_MAX: i32 = 65533;

/// Build number marking a snapshot/unreleased build
pub const SNAPSHOT_BUILD: i32 = -1;

/// Version code reserved for snapshot builds; `0` stays free for
/// "unset".
pub const SNAPSHOT_VERSION_CODE: u32 = 1;

/// Offset keeping every real version code at or above 2
const VERSION_CODE_OFFSET: u32 = 2;

const DEFAULT_BUILD_NUMBER: &str = "-1";

/// An immutable, range-checked lane version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    major: i32,
    minor: i32,
    build: i32,
}

impl Version {
    /// Constructs a version, validating every component range.
    pub fn new(major: i32, minor: i32, build: i32) -> Result<Self, ConfigError> {
        if !(0..=MAJOR_MAX).contains(&major) {
            return Err(ConfigError::OutOfRange {
                field: "Major version",
                value: major,
                min: 0,
                max: MAJOR_MAX,
            });
        }
        if !(0..=MINOR_MAX).contains(&minor) {
            return Err(ConfigError::OutOfRange {
                field: "Minor version",
                value: minor,
                min: 0,
                max: MINOR_MAX,
            });
        }
        if !(SNAPSHOT_BUILD..=BUILD_MAX).contains(&build) {
            return Err(ConfigError::OutOfRange {
                field: "Build number",
                value: build,
                min: SNAPSHOT_BUILD,
                max: BUILD_MAX,
            });
        }

        Ok(Self {
            major,
            minor,
            build,
        })
    }

    /// The sentinel version for a project with no release version
    pub fn snapshot() -> Self {
        Self {
            major: 0,
            minor: 0,
            build: SNAPSHOT_BUILD,
        }
    }

    pub fn major(&self) -> i32 {
        self.major
    }

    pub fn minor(&self) -> i32 {
        self.minor
    }

    pub fn build(&self) -> i32 {
        self.build
    }

    pub fn is_snapshot(&self) -> bool {
        self.build < 0
    }

    /// Packs the version into a single order-preserving integer.
    ///
    /// Snapshots always map to the reserved code `1`. Release versions
    /// occupy bit fields of 7/8/16 bits for major/minor/build, shifted
    /// up by 2 so no real code collides with the reserved values `0`
    /// ("unset") and `1` (snapshot). Because `build` is capped at
    /// [`BUILD_MAX`], the offset never carries into the minor field and
    /// integer order equals lexicographic `(major, minor, build)`
    /// order. The maximum code is `0x7FFF_FFFF`.
    pub fn version_code(&self) -> u32 {
        if self.build < 0 {
            return SNAPSHOT_VERSION_CODE;
        }
        let packed =
            ((self.major as u32) << 24) | ((self.minor as u32) << 16) | (self.build as u32);
        VERSION_CODE_OFFSET + packed
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_snapshot() {
            write!(f, "{}.{}-SNAPSHOT", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.build)
        }
    }
}

/// A host project's version slot.
///
/// Hosts declare a version as text (or not at all); [`setup`] replaces
/// the slot with the resolved [`Version`] so later readers see the
/// canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionField {
    /// No version declared
    #[default]
    Unspecified,

    /// Declared as text, not yet resolved
    Text(String),

    /// Resolved canonical version
    Resolved(Version),
}

impl VersionField {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<Version> for VersionField {
    fn from(version: Version) -> Self {
        Self::Resolved(version)
    }
}

/// Resolves the effective project version.
///
/// An unset version (or the literal placeholder `"unspecified"`) yields
/// the snapshot sentinel `0.0-SNAPSHOT`. An already-resolved field is
/// returned unchanged. Otherwise the text must be exactly
/// `MAJOR.MINOR`; the build number comes from the store key
/// [`BUILD_NUMBER_PROPERTY`] or the [`BUILD_NUMBER_ENV`] variable,
/// defaulting to `-1`.
///
/// Side effect: on success the resolved version is written back into
/// `field` so re-entry is idempotent and later readers see the
/// canonical value.
pub fn setup(
    field: &mut VersionField,
    store: &dyn ConfigStore,
    env: &dyn Environment,
) -> Result<Version, ConfigError> {
    let raw = match &*field {
        VersionField::Resolved(version) => return Ok(*version),
        VersionField::Unspecified => None,
        VersionField::Text(text) if text == UNSPECIFIED_VERSION => None,
        VersionField::Text(text) => Some(text.clone()),
    };

    let raw = match raw {
        Some(raw) => raw,
        None => {
            let version = Version::snapshot();
            *field = VersionField::Resolved(version);
            return Ok(version);
        }
    };

    // Exactly MAJOR.MINOR; no prefix, suffix, or extra segments.
    let pattern = Regex::new(r"^(\d+)\.(\d+)$").unwrap();
    let captures = pattern
        .captures(&raw)
        .ok_or_else(|| ConfigError::InvalidVersion(raw.clone()))?;
    let major: i32 = captures
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .parse()
        .map_err(|_| ConfigError::InvalidVersion(raw.clone()))?;
    let minor: i32 = captures
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .parse()
        .map_err(|_| ConfigError::InvalidVersion(raw.clone()))?;

    let build_value = resolve_value(
        store,
        env,
        BUILD_NUMBER_PROPERTY,
        BUILD_NUMBER_ENV,
        Some(Value::String(DEFAULT_BUILD_NUMBER.to_string())),
    )
    .unwrap_or_else(|| Value::String(DEFAULT_BUILD_NUMBER.to_string()));
    let build_text = value_text(&build_value);

    let build_pattern = Regex::new(r"^-?\d+$").unwrap();
    if !build_pattern.is_match(&build_text) {
        return Err(ConfigError::InvalidBuildNumber(build_text));
    }
    let build: i32 = build_text
        .parse()
        .map_err(|_| ConfigError::InvalidBuildNumber(build_text.clone()))?;

    let version = Version::new(major, minor, build)?;
    *field = VersionField::Resolved(version);
    Ok(version)
}

/// Renders a resolved value the way a host would display it: strings
/// stay bare, everything else uses its natural form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
