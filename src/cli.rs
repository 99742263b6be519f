use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Local task manager.
/// Tasks are stored as JSON in ~/.taskboard or the directory given via --data-dir.
#[derive(Parser)]
#[command(name = "tm", version, about = "Local task manager with a stats dashboard")]
pub struct Cli {
    /// Directory holding the task store. Defaults to $TASKBOARD_DIR, then ~/.taskboard.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
