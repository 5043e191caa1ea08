//! Configuration management for stuportal
//!
//! This module handles loading, parsing, and validating configuration
//! from a YAML file, falling back to built-in defaults when no file is
//! present.

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for stuportal
///
/// Holds everything the client needs: where the portal API lives and
/// how often the join gate re-evaluates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Portal API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Join-gate evaluation settings
    #[serde(default)]
    pub gate: GateConfig,
}

/// Portal API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the portal backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://stu-portal-backend.vercel.app/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Join-gate configuration
///
/// The gate is re-evaluated on a fixed tick rather than continuously;
/// the displayed join state may be stale by at most one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Seconds between gate re-evaluations
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
}

fn default_tick_seconds() -> u64 {
    30
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Returns the parsed configuration, or the built-in defaults when the
    /// file does not exist
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(PortalError::Io)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(PortalError::Yaml)?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Config` if the base URL is not an absolute URL
    /// or the gate tick period is zero
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url).map_err(|e| {
            PortalError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
        })?;

        if self.api.timeout_seconds == 0 {
            return Err(
                PortalError::Config("api.timeout_seconds must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.gate.tick_seconds == 0 {
            return Err(
                PortalError::Config("gate.tick_seconds must be greater than 0".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.api.base_url,
            "https://stu-portal-backend.vercel.app/api"
        );
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.gate.tick_seconds, 30);
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/config.yaml").unwrap();
        assert_eq!(config.gate.tick_seconds, 30);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api:\n  base_url: \"http://localhost:9090/api\"\n  timeout_seconds: 5\ngate:\n  tick_seconds: 10\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9090/api");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.gate.tick_seconds, 10);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: \"http://localhost:9090/api\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9090/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.gate.tick_seconds, 30);
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api: [not a mapping").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            api: ApiConfig {
                base_url: "not a url".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let config = Config {
            gate: GateConfig { tick_seconds: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            api: ApiConfig {
                timeout_seconds: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
