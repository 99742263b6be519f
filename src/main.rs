//! # tm - local task manager
//!
//! ```bash
//! tm add "Buy milk" --category personal --priority low --due tomorrow
//! tm list --view pending --search milk
//! tm toggle <id>
//! tm stats
//! ```
//!
//! Tasks are stored in `~/.taskboard/tasks.json` unless `--data-dir` or
//! `TASKBOARD_DIR` points elsewhere. A first run starts with sample tasks.

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard::board::TaskBoard;
use taskboard::cli::Cli;
use taskboard::cmd::*;
use taskboard::config::Config;
use taskboard::store::{FileStore, TASKS_KEY};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.as_deref(), cli.verbose);
    init_tracing(&config.log_filter);

    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let store = FileStore::new(&config.data_dir);
    tracing::debug!(path = %store.path_for(TASKS_KEY).display(), "opening task store");
    let mut board = TaskBoard::open(store, Utc::now());

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Add { title, desc, category, priority, due } => {
            cmd_add(&mut board, title, desc, category, priority, due)
        }
        Commands::List { view, category, priority, status, search } => {
            cmd_list(&board, view, category, priority, status, search)
        }
        Commands::View { id } => cmd_view(&board, id),
        Commands::Update { id, title, desc, category, priority, due, clear_due } => {
            cmd_update(&mut board, id, title, desc, category, priority, due, clear_due)
        }
        Commands::Toggle { id } => cmd_toggle(&mut board, id),
        Commands::Delete { id } => cmd_delete(&mut board, id),
        Commands::Stats => cmd_stats(&board),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
