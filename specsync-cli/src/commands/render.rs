//! `specsync render` — local preview of the documents a sync would publish.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use specsync_core::RecordType;
use specsync_sync::{render_all, writer};

use super::Workspace;

/// Arguments for `specsync render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Only render these record types (default: every mapping).
    pub types: Vec<String>,

    /// Write documents under this directory instead of printing them.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let config = workspace.config()?;
        let schema = workspace.schema(&config)?;

        let only: Vec<RecordType> = self.types.into_iter().map(RecordType::from).collect();
        if let Some(unmapped) = only
            .iter()
            .find(|t| !config.mappings.iter().any(|m| &m.record_type() == *t))
        {
            anyhow::bail!("no mapping for record type '{unmapped}'");
        }

        let docs = render_all(workspace.root(), &config, &schema, &only)
            .context("render failed")?;

        match self.out_dir {
            Some(out_dir) => {
                let written = writer::write_documents(&out_dir, &docs)
                    .with_context(|| format!("failed to write under {}", out_dir.display()))?;
                for path in &written {
                    println!("{} {}", "✓".green().bold(), path.display());
                }
            }
            None => {
                for doc in &docs {
                    println!("# {}", doc.destination);
                    print!("{}", doc.content);
                }
            }
        }
        Ok(())
    }
}
