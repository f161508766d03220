//! Log output
//!
//! The terminal belongs to the TUI, so events go to a file through
//! `tracing-appender`. Without a configured file nothing is installed and
//! `tracing` macros are no-ops.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::filter::LevelFilter;

use crate::config::{Config, LoggingPreferences};

/// Parse a level name, e.g. `"debug"` or `"off"`
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim()).map_err(|_| anyhow!("unknown log level {:?}", level))
}

/// Resolve the configured log file against `base` when relative
pub fn resolve_log_path(file: &Path, base: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

/// Install the global subscriber. Returns the log path when one was set up.
pub fn init(prefs: &LoggingPreferences) -> Result<Option<PathBuf>> {
    let Some(ref file) = prefs.file else {
        return Ok(None);
    };

    let level = parse_level(&prefs.level)?;
    if level == LevelFilter::OFF {
        return Ok(None);
    }

    let path = resolve_log_path(file, &Config::data_dir());
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("log path {} has no parent directory", path.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let appender = tracing_appender::rolling::never(parent, file_name);

    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(Some(path))
}
