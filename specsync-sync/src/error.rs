//! Error types for specsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use specsync_core::{ConfigError, RecordType, SchemaError};
use specsync_renderer::RenderError;

/// Failures talking to the remote repository service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("{method} {url} returned HTTP {status}: {message}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },

    /// Connection, TLS or timeout failure before a response arrived.
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },

    /// A success response whose body did not have the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The API token variable is unset or empty.
    #[error("{var} environment variable is not set")]
    MissingToken { var: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document is not valid YAML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The source document has no mapping under the payload key.
    #[error("{path} has no `{key}` mapping")]
    MissingPayload { path: PathBuf, key: String },

    /// The schema does not declare this record type and the policy is `fail`.
    #[error("record type '{record_type}' (from {path}) is not declared in the schema")]
    UnknownRecordType {
        record_type: RecordType,
        path: PathBuf,
    },

    /// A destination that would escape the output directory.
    #[error("refusing to write destination '{0}' outside the output directory")]
    UnsafeDestination(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
