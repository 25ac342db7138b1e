//! Error types for specsync-renderer.

use thiserror::Error;

/// All errors that can arise from document or message rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (message templates).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// serde_yaml failed to emit a scalar.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mapping key that cannot be written as a plain block key.
    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),

    /// The branch template rendered to something git will not accept.
    #[error("invalid branch name {0:?}")]
    InvalidBranchName(String),
}
