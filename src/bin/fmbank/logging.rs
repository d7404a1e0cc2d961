//! File logging for the TUI
//!
//! The terminal belongs to ratatui while the session runs, so log records
//! go to a file instead of stderr. `RUST_LOG` overrides the default filter.

use color_eyre::eyre::{Result, WrapErr};
use env_logger::{Builder, Env, Target};
use std::{fs::File, path::PathBuf};

const DEFAULT_FILTER: &str = "info";

pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("fmbank.log")
}

/// Install the global logger, writing to [`log_path`].
pub fn init() -> Result<PathBuf> {
    let path = log_path();
    let file = File::create(&path)
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;

    to_file(Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)), file)
        .try_init()
        .wrap_err("logger already installed")?;

    log::info!("fmbank {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(path)
}

fn to_file(mut builder: Builder, file: File) -> Builder {
    builder
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis();
    builder
}
