//! # specsync-sync
//!
//! Source loading, the remote repository seam, the GitHub client and the
//! sync driver.
//!
//! Call [`render_all`] to preview documents locally, or build a
//! [`SyncDriver`] over a [`RemoteRepository`] and [`SyncDriver::run`] it to
//! publish them as a pull request.

pub mod error;
pub mod github;
pub mod pipeline;
pub mod remote;
pub mod source;
pub mod writer;

pub use error::{RemoteError, SyncError};
pub use github::GitHubClient;
pub use pipeline::{
    render_all, render_document, FileOutcome, RenderedDocument, SyncDriver, SyncReport,
    UploadAction,
};
pub use remote::{FileWrite, PullRequest, PullRequestRequest, RemoteFile, RemoteRepository, Token};
