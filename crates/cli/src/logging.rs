use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use clichat_core::config::{LogFormat, LoggingConfig};
use tracing::Level;

/// Installs the global subscriber. Stdout belongs to the conversation, so
/// events are appended to `logging.file` instead.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("could not open log file `{}`", config.file.display()))?;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_max_level(log_level)
        .with_writer(Mutex::new(file));

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("could not install log subscriber: {error}"))
}
