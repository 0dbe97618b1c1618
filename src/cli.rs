use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Recurring obligation manager CLI.
/// Storage defaults to ~/.rtask/patterns.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "rtask", version, about = "Recurring task pattern and generation CLI")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
