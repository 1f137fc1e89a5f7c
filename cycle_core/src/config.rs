//! Configuration file support for the forecast engine.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cycle/config.toml`.
//! Every field has a default, so a partial file (or none at all) is valid.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shortest cycle length the engine will ever project with.
pub const MIN_CYCLE_DAYS: i64 = 21;
/// Longest cycle length the engine will ever project with.
pub const MAX_CYCLE_DAYS: i64 = 40;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Forecast parameters shared by every engine operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Size of the trailing window (in calendar months, ending today) that
    /// cycle inference looks at.
    #[serde(default = "default_months_back")]
    pub months_back: u32,

    /// Number of calendar months the monthly projector produces.
    #[serde(default = "default_months_ahead")]
    pub months_ahead: u32,

    /// Cycle length used when no valid cycle can be measured.
    #[serde(default = "default_cycle_days")]
    pub default_cycle_days: i64,

    /// Period length used when no bleeding run can be measured.
    #[serde(default = "default_period_days")]
    pub default_period_days: i64,

    /// Maximum number of most recent cycles averaged into the cycle length.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            months_back: default_months_back(),
            months_ahead: default_months_ahead(),
            default_cycle_days: default_cycle_days(),
            default_period_days: default_period_days(),
            max_cycles: default_max_cycles(),
        }
    }
}

impl ForecastConfig {
    /// Check that the parameters describe a usable forecast
    pub fn validate(&self) -> Result<()> {
        if self.months_back == 0 {
            return Err(Error::Config("months_back must be at least 1".into()));
        }
        if self.max_cycles == 0 {
            return Err(Error::Config("max_cycles must be at least 1".into()));
        }
        if !(MIN_CYCLE_DAYS..=MAX_CYCLE_DAYS).contains(&self.default_cycle_days) {
            return Err(Error::Config(format!(
                "default_cycle_days must be within {}..={}, got {}",
                MIN_CYCLE_DAYS, MAX_CYCLE_DAYS, self.default_cycle_days
            )));
        }
        if self.default_period_days < 1 {
            return Err(Error::Config(format!(
                "default_period_days must be positive, got {}",
                self.default_period_days
            )));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_months_back() -> u32 {
    3
}

fn default_months_ahead() -> u32 {
    3
}

fn default_cycle_days() -> i64 {
    28
}

fn default_period_days() -> i64 {
    5
}

fn default_max_cycles() -> usize {
    3
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            path => {
                tracing::info!("No config file found at {:?}, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    ///
    /// The forecast section is validated after parsing.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.forecast.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    ///
    /// Returns `None` when the platform has no config directory and HOME is unset.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .map(|base| base.join("cycle").join("config.toml"))
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()
            .ok_or_else(|| Error::Config("No config directory available".into()))?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.forecast.months_back, 3);
        assert_eq!(config.forecast.months_ahead, 3);
        assert_eq!(config.forecast.default_cycle_days, 28);
        assert_eq!(config.forecast.default_period_days, 5);
        assert_eq!(config.forecast.max_cycles, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.forecast.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.forecast, parsed.forecast);
        assert_eq!(config.logging.level, parsed.logging.level);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[forecast]
default_cycle_days = 30
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.forecast.default_cycle_days, 30);
        assert_eq!(config.forecast.max_cycles, 3); // default
        assert_eq!(config.logging.level, "info"); // default
    }

    #[test]
    fn test_validate_rejects_out_of_range_cycle() {
        let forecast = ForecastConfig {
            default_cycle_days: 45,
            ..ForecastConfig::default()
        };
        assert!(matches!(forecast.validate(), Err(Error::Config(_))));

        let forecast = ForecastConfig {
            max_cycles: 0,
            ..ForecastConfig::default()
        };
        assert!(matches!(forecast.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load_from_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.forecast.months_ahead = 6;
        config.logging.level = "debug".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.forecast.months_ahead, 6);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_load_from_rejects_invalid_forecast() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[forecast]\nmonths_back = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
