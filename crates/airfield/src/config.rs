//! Configuration management for airfield.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::{DEFAULT_MAX_FLIGHTS_PER_DAY, DEFAULT_MIN_GROUND_TIME_MINUTES};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user config dir holding the config file.
const CONFIG_DIR_NAME: &str = "airfield";

/// Default flights database, relative to the working directory.
const DEFAULT_DATABASE_PATH: &str = "./flights_database.csv";

/// Prefix for environment overrides, e.g. `AIRFIELD_ADMISSION__MAX_FLIGHTS_PER_DAY`.
const ENV_PREFIX: &str = "AIRFIELD_";

/// Environment variable naming the database file, kept for existing deployments.
const LEGACY_DATABASE_ENV: &str = "FLIGHTS_DATABASE_CSV_FILE";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `AIRFIELD_`, `__` between sections)
/// 2. TOML config file at `~/.config/airfield/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Admission rules.
    pub admission: AdmissionConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Admission rule thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Number of successful flights after which further flights fail.
    pub max_flights_per_day: usize,
    /// Minimum ground time in minutes.
    pub min_ground_time_minutes: i64,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the flights CSV database.
    /// Defaults to `./flights_database.csv`
    pub database_path: Option<PathBuf>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_flights_per_day: DEFAULT_MAX_FLIGHTS_PER_DAY,
            min_ground_time_minutes: DEFAULT_MIN_GROUND_TIME_MINUTES,
        }
    }
}

impl AdmissionConfig {
    /// Get the minimum ground time as a Duration.
    ///
    /// Saturates at [`Duration::MAX`]; [`Config::validate`] rejects values
    /// that large.
    #[must_use]
    pub fn min_ground_time(&self) -> Duration {
        Duration::try_minutes(self.min_ground_time_minutes).unwrap_or(Duration::MAX)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(
                Env::raw()
                    .only(&[LEGACY_DATABASE_ENV])
                    .map(|_| "storage.database_path".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.admission.min_ground_time_minutes < 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_ground_time_minutes ({}) cannot be negative",
                    self.admission.min_ground_time_minutes
                ),
            });
        }

        if Duration::try_minutes(self.admission.min_ground_time_minutes).is_none() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_ground_time_minutes ({}) is out of range",
                    self.admission.min_ground_time_minutes
                ),
            });
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "database_path cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.admission.max_flights_per_day, 20);
        assert_eq!(config.admission.min_ground_time_minutes, 180);
        assert!(config.storage.database_path.is_none());
    }

    #[test]
    fn test_min_ground_time() {
        let admission = AdmissionConfig::default();
        assert_eq!(admission.min_ground_time(), Duration::hours(3));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_ground_time() {
        let mut config = Config::default();
        config.admission.min_ground_time_minutes = -5;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("min_ground_time_minutes"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database_path"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert_eq!(
            config.database_path(),
            PathBuf::from("./flights_database.csv")
        );
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/srv/flights.csv"));

        assert_eq!(config.database_path(), PathBuf::from("/srv/flights.csv"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("airfield"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_validate_ground_time_out_of_range() {
        let mut config = Config::default();
        config.admission.min_ground_time_minutes = i64::MAX;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert!(err.to_string().contains("out of range"));
        assert_eq!(config.admission.min_ground_time(), Duration::MAX);
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            // Loading from a nonexistent path should work (uses defaults)
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.admission, AdmissionConfig::default());
            assert!(config.storage.database_path.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[admission]\nmax_flights_per_day = 2\nmin_ground_time_minutes = 90\n\n\
                 [storage]\ndatabase_path = \"/tmp/flights.csv\"\n",
            )?;

            let config =
                Config::load_from(Some(PathBuf::from("config.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.admission.max_flights_per_day, 2);
            assert_eq!(config.admission.min_ground_time_minutes, 90);
            assert_eq!(config.database_path(), PathBuf::from("/tmp/flights.csv"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_toml_values() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[admission]\nmin_ground_time_minutes = -1\n")?;

            let result = Config::load_from(Some(PathBuf::from("config.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_huge_ground_time() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[admission]\nmin_ground_time_minutes = 9223372036854775807\n",
            )?;

            let result = Config::load_from(Some(PathBuf::from("config.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_wrong_types() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[admission]\nmax_flights_per_day = \"many\"\n")?;

            let result = Config::load_from(Some(PathBuf::from("config.toml")));
            assert!(matches!(result, Err(Error::ConfigLoad(_))));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[admission]\nmax_flights_per_day = 2\nmin_ground_time_minutes = 90\n",
            )?;
            jail.set_env("AIRFIELD_ADMISSION__MAX_FLIGHTS_PER_DAY", "7");

            let config =
                Config::load_from(Some(PathBuf::from("config.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.admission.max_flights_per_day, 7);
            assert_eq!(config.admission.min_ground_time_minutes, 90);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_database_env() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[storage]\ndatabase_path = \"from_file.csv\"\n")?;
            jail.set_env("FLIGHTS_DATABASE_CSV_FILE", "legacy.csv");

            let config =
                Config::load_from(Some(PathBuf::from("config.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.database_path(), PathBuf::from("legacy.csv"));
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_database_env_beats_legacy() {
        Jail::expect_with(|jail| {
            jail.set_env("FLIGHTS_DATABASE_CSV_FILE", "legacy.csv");
            jail.set_env("AIRFIELD_STORAGE__DATABASE_PATH", "current.csv");

            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.database_path(), PathBuf::from("current.csv"));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("max_flights_per_day"));
        assert!(json.contains("database_path"));
    }

    #[test]
    fn test_admission_config_deserialize() {
        let json = r#"{"max_flights_per_day": 7}"#;
        let admission: AdmissionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(admission.max_flights_per_day, 7);
        assert_eq!(admission.min_ground_time_minutes, 180);
    }
}
