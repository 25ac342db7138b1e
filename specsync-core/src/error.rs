//! Error types for specsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating an ordering schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Underlying I/O failure reading the schema document.
    #[error("I/O error reading schema at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse schema at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but its shape is not a usable ordering schema.
    #[error("malformed schema: {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// Nested order lists go deeper than record → list → list.
    #[error("malformed schema: {location}: nesting exceeds {max} levels")]
    TooDeep { location: String, max: usize },
}

impl SchemaError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error on load.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}
