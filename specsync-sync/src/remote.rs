//! Remote repository seam.
//!
//! The sync driver only ever talks to a [`RemoteRepository`]. The GitHub
//! implementation lives in [`crate::github`]; tests substitute an in-memory
//! one.

use std::fmt;

use crate::error::{RemoteError, SyncError};

/// API token read from the environment. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read `var`; unset or blank is [`SyncError::MissingToken`].
    pub fn from_env(var: &str) -> Result<Self, SyncError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self(value.trim().to_owned())),
            _ => Err(SyncError::MissingToken {
                var: var.to_owned(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// An existing file on a branch; `sha` is the blob revision update needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
    pub sha: String,
}

/// A create or update of one file on one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Operations the driver needs from the hosting service.
pub trait RemoteRepository {
    /// Commit sha at the tip of `branch`.
    fn branch_head(&self, branch: &str) -> Result<String, RemoteError>;

    /// Create `refs/heads/<branch>` pointing at `sha`.
    fn create_branch(&self, branch: &str, sha: &str) -> Result<(), RemoteError>;

    /// Look up `path` at `git_ref`. Absence is `Ok(None)`, not an error.
    fn get_file(&self, path: &str, git_ref: &str) -> Result<Option<RemoteFile>, RemoteError>;

    fn create_file(&self, write: &FileWrite) -> Result<(), RemoteError>;

    /// Overwrite a file whose current blob is `sha`.
    fn update_file(&self, write: &FileWrite, sha: &str) -> Result<(), RemoteError>;

    fn create_pull_request(&self, request: &PullRequestRequest)
        -> Result<PullRequest, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let t = Token::new("ghp_secret");
        assert_eq!(format!("{t:?}"), "Token(***)");
        assert_eq!(t.expose(), "ghp_secret");
    }

    #[test]
    fn missing_token_names_the_variable() {
        let err = Token::from_env("SPECSYNC_TEST_TOKEN_THAT_IS_NEVER_SET").unwrap_err();
        assert!(matches!(err, SyncError::MissingToken { .. }));
        assert!(err
            .to_string()
            .contains("SPECSYNC_TEST_TOKEN_THAT_IS_NEVER_SET environment variable is not set"));
    }
}
