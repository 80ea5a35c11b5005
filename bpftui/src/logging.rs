//! Logger setup
//!
//! The terminal belongs to the TUI while it runs, so log records either go
//! to a file or, when `RUST_LOG` is set explicitly, to stderr.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "info";

/// Install the global logger
///
/// # Errors
/// Returns an error if the log file cannot be opened or a logger is
/// already installed.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None if std::env::var_os("RUST_LOG").is_some() => Builder::from_default_env(),
        None => return Ok(()),
    };

    builder.try_init().context("Failed to initialize logger")
}
