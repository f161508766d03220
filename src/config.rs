//! Configuration management
//!
//! Load user preferences from a TOML config file. Only preferences live here;
//! the gradient session itself is never written to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::color_space::Rgb;
use crate::gradient::{Gradient, COPY_FEEDBACK_DELAY, DEFAULT_FROM, DEFAULT_TO};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gradient: GradientPreferences,
    pub export: ExportPreferences,
    pub logging: LoggingPreferences,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("com", "gradbox", "gradbox") {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => PathBuf::from("gradbox.toml"),
        }
    }

    /// Directory for relative log file paths
    pub fn data_dir() -> PathBuf {
        match ProjectDirs::from("com", "gradbox", "gradbox") {
            Some(dirs) => dirs.data_local_dir().to_path_buf(),
            None => PathBuf::from("."),
        }
    }
}

/// Starting gradient and feedback timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientPreferences {
    pub initial_from: Rgb,
    pub initial_to: Rgb,
    pub copy_feedback_ms: u64,
}

impl Default for GradientPreferences {
    fn default() -> Self {
        Self {
            initial_from: DEFAULT_FROM,
            initial_to: DEFAULT_TO,
            copy_feedback_ms: COPY_FEEDBACK_DELAY.as_millis() as u64,
        }
    }
}

impl GradientPreferences {
    pub fn initial_gradient(&self) -> Gradient {
        Gradient::new(self.initial_from, self.initial_to)
    }

    pub fn copy_feedback_delay(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// PNG export preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPreferences {
    pub width: u32,
    pub height: u32,
    pub directory: PathBuf,
}

impl Default for ExportPreferences {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            directory: PathBuf::from("."),
        }
    }
}

/// Log output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// off, error, warn, info, debug or trace
    pub level: String,
    /// Log file; relative paths resolve against the data directory.
    /// No file means no logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
