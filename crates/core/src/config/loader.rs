//! Configuration file loading and environment overrides

use super::schema::BenchConfig;
use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "wirebench.toml";

impl BenchConfig {
    /// Load configuration from a file path (or `wirebench.toml` when present),
    /// then apply environment overrides
    ///
    /// Reads the following environment variables:
    /// - `WIREBENCH_DATABASE`: database holding the benchmark collections
    /// - `WIREBENCH_TIMEOUT_SECS`: overall deadline in seconds
    /// - `WIREBENCH_PAUSE_MS`: pause between runs in milliseconds
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let mut config = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => Self::default(),
        };

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(database) = lookup("WIREBENCH_DATABASE") {
            self.database = database;
        }

        if let Some(raw) = lookup("WIREBENCH_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::invalid_config_value("WIREBENCH_TIMEOUT_SECS", format!("'{}' is not a number", raw))
            })?;
            self.deadline = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("WIREBENCH_PAUSE_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                Error::invalid_config_value("WIREBENCH_PAUSE_MS", format!("'{}' is not a number", raw))
            })?;
            self.pause = Duration::from_millis(ms);
        }

        Ok(())
    }
}

/// Find the configuration file in the working directory
fn find_config_file() -> Option<PathBuf> {
    let candidate = Path::new(DEFAULT_CONFIG_FILE);
    candidate.exists().then(|| candidate.to_path_buf())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<BenchConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
            .with_source(e)
    })
}
