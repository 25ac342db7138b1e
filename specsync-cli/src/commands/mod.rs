//! Subcommands. Each one resolves its configuration through [`Workspace`].

pub mod mappings;
pub mod render;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use specsync_core::{Schema, SyncConfig};

/// Root directory plus the optional explicit config path from the command line.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config_path: Option<PathBuf>,
}

impl Workspace {
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self { root, config_path }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> Result<SyncConfig> {
        SyncConfig::resolve(&self.root, self.config_path.as_deref())
            .context("failed to load configuration")
    }

    pub fn schema(&self, config: &SyncConfig) -> Result<Schema> {
        let path = self.root.join(&config.schema.path);
        Schema::load(&path, config.schema.format, &config.payload_key)
            .with_context(|| format!("failed to load schema from {}", path.display()))
    }
}
