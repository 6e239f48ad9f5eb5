use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

/// Sends `tracing` output to a log file, since the terminal belongs to the UI.
pub fn init(level: tracing::Level) -> Result<PathBuf> {
    let log_dir = dirs::cache_dir()
        .context("Could not find cache directory")?
        .join("scrubline");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_path = log_dir.join("scrubline.log");
    let file = File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .init();

    Ok(log_path)
}
