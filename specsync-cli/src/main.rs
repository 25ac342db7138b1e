//! specsync — publish ordered specification documents as a pull request.
//!
//! # Usage
//!
//! ```text
//! specsync [-v] [--config PATH] [--root DIR] sync
//! specsync [-v] [--config PATH] [--root DIR] render [--out-dir DIR] [TYPE...]
//! specsync [-v] [--config PATH] [--root DIR] mappings [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{mappings::MappingsArgs, render::RenderArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "specsync",
    version,
    about = "Reorder specification records and publish them to GitHub",
    long_about = None,
)]
struct Cli {
    /// Path to the run configuration (default: specsync.yaml under --root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory that source and schema paths are relative to.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every mapped record and open a pull request with the results.
    Sync(SyncArgs),

    /// Render mapped records locally without touching the remote.
    Render(RenderArgs),

    /// List the effective file mapping.
    Mappings(MappingsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let workspace = commands::Workspace::new(cli.root, cli.config);
    match cli.command {
        Commands::Sync(args) => args.run(&workspace),
        Commands::Render(args) => args.run(&workspace),
        Commands::Mappings(args) => args.run(&workspace),
    }
}
