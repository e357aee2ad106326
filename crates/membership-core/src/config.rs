//! Application configuration management.
//!
//! This module handles loading and saving the membership workflow settings:
//! who receives applications, the resubmission cooldown, and how the
//! simulated submission behaves.
//!
//! Configuration is stored at `~/.config/odiham-membership/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_COOLDOWN_MS;
use crate::submit::{DEFAULT_LATENCY_MS, DEFAULT_RECIPIENT};

/// Application name used for the config directory path
const APP_NAME: &str = "odiham-membership";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address accepted applications are forwarded to
    pub recipient: String,
    /// Minimum time between accepted submissions from one session
    pub cooldown_ms: u64,
    /// Delay before the simulated submission completes
    pub simulated_latency_ms: u64,
    /// Make the simulated collaborator fail instead of acknowledging
    pub simulate_failure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            simulated_latency_ms: DEFAULT_LATENCY_MS,
            simulate_failure: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("nope.json")).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.cooldown(), Duration::from_secs(30));
        assert_eq!(config.simulated_latency(), Duration::from_secs(2));
        assert_eq!(config.recipient, "membership@28thodiham.org.uk");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = Config {
            cooldown_ms: 5_000,
            simulate_failure: true,
            ..Config::default()
        };
        config.save_to(&path).expect("save");
        assert_eq!(Config::load_from(&path).expect("load"), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"cooldown_ms": 1000}"#).expect("write");
        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.cooldown_ms, 1000);
        assert_eq!(config.simulated_latency_ms, DEFAULT_LATENCY_MS);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{not json").expect("write");
        assert!(Config::load_from(&path).is_err());
    }
}
