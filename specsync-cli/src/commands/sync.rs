//! `specsync sync` — publish every mapped record as one pull request.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use specsync_renderer::format_timestamp;
use specsync_sync::{GitHubClient, SyncDriver, SyncReport, Token, UploadAction};

use super::Workspace;

/// Arguments for `specsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {}

impl SyncArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let config = workspace.config()?;
        // The config names the token variable; everything after it needs the
        // token, so a missing one never leaves a half-created branch behind.
        let token = Token::from_env(&config.token_env)?;
        let schema = workspace.schema(&config)?;

        let client = GitHubClient::new(&config, token)?;
        let driver = SyncDriver::new(&client, &config, &schema, workspace.root())
            .context("failed to prepare message templates")?;
        let timestamp = format_timestamp(&Local::now());
        let report = driver
            .run(&timestamp)
            .with_context(|| format!("sync to {} failed", config.repository))?;

        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    println!("branch {}", report.branch.bold());
    for file in &report.files {
        let marker = match file.action {
            UploadAction::Created => "+".green().bold(),
            UploadAction::Updated => "✎".yellow().bold(),
        };
        println!("  {marker} {} ({})", file.destination, file.record_type);
    }
    println!(
        "{} pull request #{}: {}",
        "✓".green().bold(),
        report.pull_request.number,
        report.pull_request.html_url
    );
}
