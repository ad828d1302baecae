//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file: `--config PATH`, or `config.toml` in the platform config
//!    directory
//! 3. Environment variables prefixed `DUPESCAN_` (e.g. `DUPESCAN_WORKERS=8`)
//! 4. Command-line flags, applied by the caller with [`Config::with_overrides`]
//!
//! ```toml
//! workers = 4
//! queue_capacity = 256
//! output = "json"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::scanner::{ScanConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};

/// Environment variable prefix for configuration keys.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workers per pipeline phase
    pub workers: usize,
    /// Capacity of each phase's work queue
    pub queue_capacity: usize,
    /// Report format
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// With `explicit` set, that file must exist. Otherwise the default
    /// platform path is used if present and silently skipped if not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing explicit file and
    /// [`ConfigError::Invalid`] when any layer fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };

        match &file {
            Some(path) => log::debug!("Loading config from {}", path.display()),
            None => log::debug!("No config file, using defaults and environment"),
        }

        let config: Self = Self::figment(file.as_deref()).extract()?;
        Ok(config)
    }

    /// Build the figment for the given file, without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default platform-specific config file path, if one can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupescan").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded layers.
    #[must_use]
    pub fn with_overrides(
        mut self,
        workers: Option<usize>,
        queue_capacity: Option<usize>,
        output: Option<OutputFormat>,
    ) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        if let Some(capacity) = queue_capacity {
            self.queue_capacity = capacity;
        }
        if let Some(output) = output {
            self.output = output;
        }
        self
    }

    /// Core scan settings derived from this configuration.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
    }
}
