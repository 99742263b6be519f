//! Runtime configuration: where tasks are stored and how loudly to log.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKBOARD_DIR";

const DEFAULT_DIR_NAME: &str = ".taskboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve from the command line, falling back to the environment.
    pub fn resolve(data_dir: Option<&Path>, verbose: u8) -> Self {
        Config::resolve_with(
            data_dir,
            verbose,
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    /// Precedence: flag, `TASKBOARD_DIR`, `$HOME/.taskboard`, `./.taskboard`.
    pub fn resolve_with(
        flag: Option<&Path>,
        verbose: u8,
        env_dir: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Self {
        let data_dir = flag
            .map(Path::to_path_buf)
            .or(env_dir.filter(|p| !p.as_os_str().is_empty()))
            .unwrap_or_else(|| home.unwrap_or_else(|| PathBuf::from(".")).join(DEFAULT_DIR_NAME));
        Config { data_dir, log_filter: log_filter(verbose).to_string() }
    }
}

/// Default `tracing` filter for a `-v` count. `RUST_LOG` overrides it.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
