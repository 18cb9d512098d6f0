//! Error types for configuration resolution
//!
//! Every error is fatal to the calling operation and carries the
//! offending key, value, or field together with its valid bound. A
//! missing properties file is not an error.

use std::io;
use std::path::PathBuf;

use crate::properties::ParseError;

/// Errors raised while resolving configuration or deriving a version
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required property \"{key}\" or environment variable \"{env_var}\" missing")]
    MissingValue { key: String, env_var: String },

    #[error("Invalid project version \"{0}\"")]
    InvalidVersion(String),

    #[error("Invalid build number \"{0}\"")]
    InvalidBuildNumber(String),

    #[error("{field} \"{value}\" must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Unable to determine the user home directory")]
    NoHomeDirectory,

    #[error("Failed to read properties file \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse properties file \"{}\": {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
