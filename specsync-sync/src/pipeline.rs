//! Sync driver: render every mapped record and publish it as one pull request.
//!
//! ## Run protocol
//!
//! 1. Render the branch name from the run timestamp.
//! 2. Read the base branch head and create the working branch from it.
//! 3. For each mapping, in order: load payload → order → render → upsert.
//!    The first failure is logged with its destination and ends the run;
//!    files already pushed to the branch stay there.
//! 4. Open a single pull request from the working branch to the base branch.

use std::path::{Path, PathBuf};

use specsync_core::{FileMapping, RecordType, Schema, SyncConfig, UnknownTypePolicy};
use specsync_renderer::{FrontmatterRenderer, MessageContext, MessageEngine, MessageKind};

use crate::error::SyncError;
use crate::remote::{FileWrite, PullRequest, PullRequestRequest, RemoteRepository};
use crate::source;

// ---------------------------------------------------------------------------
// Local rendering
// ---------------------------------------------------------------------------

/// One ordered, serialized record ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub record_type: RecordType,
    pub source: PathBuf,
    pub destination: String,
    pub content: String,
}

/// Load, order and render the document for one mapping. No remote calls.
pub fn render_document(
    root: &Path,
    mapping: &FileMapping,
    config: &SyncConfig,
    schema: &Schema,
) -> Result<RenderedDocument, SyncError> {
    let source_path = root.join(&mapping.source);
    let payload = source::load_payload(&source_path, &config.payload_key)?;

    let record_type = mapping.record_type();
    if !schema.contains(&record_type) {
        match config.unknown_types {
            UnknownTypePolicy::Fail => {
                return Err(SyncError::UnknownRecordType {
                    record_type,
                    path: source_path,
                })
            }
            UnknownTypePolicy::PassThrough => {
                tracing::warn!("no schema order for '{record_type}'; publishing unchanged")
            }
        }
    }

    let ordered = schema.order_record(&record_type, &payload);
    let content = FrontmatterRenderer::new(config.envelope).render(&ordered)?;
    Ok(RenderedDocument {
        record_type,
        source: source_path,
        destination: mapping.destination.clone(),
        content,
    })
}

/// Render every mapping, or only those whose record type is in `only`.
pub fn render_all(
    root: &Path,
    config: &SyncConfig,
    schema: &Schema,
    only: &[RecordType],
) -> Result<Vec<RenderedDocument>, SyncError> {
    config
        .mappings
        .iter()
        .filter(|m| only.is_empty() || only.contains(&m.record_type()))
        .map(|m| render_document(root, m, config, schema))
        .collect()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub destination: String,
    pub record_type: RecordType,
    pub action: UploadAction,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub branch: String,
    pub files: Vec<FileOutcome>,
    pub pull_request: PullRequest,
}

// ---------------------------------------------------------------------------
// SyncDriver
// ---------------------------------------------------------------------------

/// Publishes rendered documents through a [`RemoteRepository`].
///
/// Schema and config are read-only for the life of the driver.
pub struct SyncDriver<'a, R: RemoteRepository + ?Sized> {
    remote: &'a R,
    config: &'a SyncConfig,
    schema: &'a Schema,
    root: &'a Path,
    messages: MessageEngine,
}

impl<'a, R: RemoteRepository + ?Sized> SyncDriver<'a, R> {
    /// Compiles the message templates up front, so a bad template fails
    /// before any remote call.
    pub fn new(
        remote: &'a R,
        config: &'a SyncConfig,
        schema: &'a Schema,
        root: &'a Path,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            remote,
            config,
            schema,
            root,
            messages: MessageEngine::new(&config.templates)?,
        })
    }

    /// Execute the full run protocol. `timestamp` feeds every template.
    pub fn run(&self, timestamp: &str) -> Result<SyncReport, SyncError> {
        let ctx = MessageContext::new(timestamp);
        let branch = self.messages.branch_name(&ctx)?;
        let base = &self.config.base_branch;

        let head = self.remote.branch_head(base)?;
        self.remote.create_branch(&branch, &head)?;
        tracing::info!("created branch {branch} from {base} at {head}");

        let mut files = Vec::with_capacity(self.config.mappings.len());
        for mapping in &self.config.mappings {
            match self.publish(mapping, &branch, &ctx) {
                Ok(outcome) => files.push(outcome),
                Err(err) => {
                    tracing::error!("error updating {}: {err}", mapping.destination);
                    return Err(err);
                }
            }
        }

        let request = PullRequestRequest {
            title: self.messages.render(MessageKind::PrTitle, &ctx)?,
            body: self.messages.render(MessageKind::PrBody, &ctx)?,
            head: branch.clone(),
            base: base.clone(),
        };
        let pull_request = self.remote.create_pull_request(&request).map_err(|err| {
            tracing::error!("error creating pull request: {err}");
            err
        })?;
        tracing::info!("pull request created: {}", pull_request.html_url);

        Ok(SyncReport {
            branch,
            files,
            pull_request,
        })
    }

    fn publish(
        &self,
        mapping: &FileMapping,
        branch: &str,
        ctx: &MessageContext,
    ) -> Result<FileOutcome, SyncError> {
        let doc = render_document(self.root, mapping, self.config, self.schema)?;
        let action = self.upsert(&doc, branch, ctx)?;
        tracing::info!("{}: {}", action_label(action), doc.destination);
        Ok(FileOutcome {
            destination: doc.destination,
            record_type: doc.record_type,
            action,
        })
    }

    /// Update in place when the file exists on `branch`, otherwise create it.
    fn upsert(
        &self,
        doc: &RenderedDocument,
        branch: &str,
        ctx: &MessageContext,
    ) -> Result<UploadAction, SyncError> {
        tracing::debug!("probing {} on {branch}", doc.destination);
        let existing = self.remote.get_file(&doc.destination, branch)?;

        let file_ctx = ctx.for_file(&doc.destination, &doc.record_type);
        let kind = match existing {
            Some(_) => MessageKind::CommitUpdate,
            None => MessageKind::CommitCreate,
        };
        let write = FileWrite {
            path: doc.destination.clone(),
            branch: branch.to_owned(),
            message: self.messages.render(kind, &file_ctx)?,
            content: doc.content.clone(),
        };

        match existing {
            Some(file) => {
                self.remote.update_file(&write, &file.sha)?;
                Ok(UploadAction::Updated)
            }
            None => {
                self.remote.create_file(&write)?;
                Ok(UploadAction::Created)
            }
        }
    }
}

fn action_label(action: UploadAction) -> &'static str {
    match action {
        UploadAction::Created => "created",
        UploadAction::Updated => "updated",
    }
}
