// AgroClima Monitor - Refresh scheduler and HTTP surface
// Copyright (c) 2025 AgroClima Vega contributors
//
// Licensed under the MIT License.
// See LICENSE file for details.

//! Monitor configuration.
//!
//! Loaded from an optional JSON file; command-line flags override it.

use crate::error::{MonitorError, Result};
use agroclima::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Port to listen on.
    pub port: u16,
    /// Live refresh period in milliseconds.
    pub refresh_interval_ms: u64,
    /// Connectivity flag update period in milliseconds.
    pub connectivity_interval_ms: u64,
    /// Chance per update that the flag toggles instead of reporting connected.
    pub connectivity_flip_probability: f64,
    /// Engine settings.
    pub engine: EngineConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: 9100,
            refresh_interval_ms: 5_000,       // 5 seconds
            connectivity_interval_ms: 30_000, // 30 seconds
            connectivity_flip_probability: 0.1,
            engine: EngineConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(MonitorError::InvalidConfig(
                "refresh_interval_ms must be positive".to_string(),
            ));
        }
        if self.connectivity_interval_ms == 0 {
            return Err(MonitorError::InvalidConfig(
                "connectivity_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.connectivity_flip_probability) {
            return Err(MonitorError::InvalidConfig(format!(
                "connectivity_flip_probability must be within 0-1, got {}",
                self.connectivity_flip_probability
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn connectivity_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.connectivity_interval(), Duration::from_secs(30));
        assert_eq!(config.engine.history_capacity, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "refresh_interval_ms": 1000, "engine": {{ "history_capacity": 48 }} }}"#
        )
        .unwrap();

        let config = MonitorConfig::from_json(file.path()).unwrap();
        assert_eq!(config.refresh_interval_ms, 1000);
        assert_eq!(config.engine.history_capacity, 48);
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MonitorConfig {
            refresh_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::InvalidConfig(_))));

        let config = MonitorConfig {
            connectivity_flip_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MonitorConfig::from_json("/nonexistent/agroclima.json"),
            Err(MonitorError::Io(_))
        ));
    }
}
