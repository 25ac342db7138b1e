//! `specsync mappings` — show which source feeds which destination.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use specsync_core::{Schema, SyncConfig};

use super::Workspace;

/// Arguments for `specsync mappings`.
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct MappingRow {
    #[tabled(rename = "type")]
    record_type: String,
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "destination")]
    destination: String,
    #[tabled(rename = "in schema")]
    in_schema: bool,
}

impl MappingsArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let config = workspace.config()?;
        let schema = workspace.schema(&config)?;
        let rows = rows(&config, &schema);

        if self.json {
            let json = serde_json::to_string_pretty(&rows).context("failed to encode JSON")?;
            println!("{json}");
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        Ok(())
    }
}

fn rows(config: &SyncConfig, schema: &Schema) -> Vec<MappingRow> {
    config
        .mappings
        .iter()
        .map(|m| {
            let record_type = m.record_type();
            MappingRow {
                in_schema: schema.contains(&record_type),
                record_type: record_type.to_string(),
                source: m.source.display().to_string(),
                destination: m.destination.clone(),
            }
        })
        .collect()
}
