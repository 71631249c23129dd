//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use quest_tracker_core::domain::DEFAULT_WEIGHT;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the profile and its history are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// A single JSON document on disk.
    JsonFile(PathBuf),
    /// PostgreSQL tables, reached through `DATABASE_URL`.
    Postgres(String),
    /// Process memory only; everything is lost on restart.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub storage: StorageBackend,
    pub initial_weight: f64,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Storage Settings ---
        let backend = var("STORAGE_BACKEND").unwrap_or_else(|| "json".to_string());
        let storage = match backend.to_lowercase().as_str() {
            "json" => StorageBackend::JsonFile(
                var("DATA_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data.json")),
            ),
            "postgres" => StorageBackend::Postgres(
                var("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
            ),
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND".to_string(),
                    format!("'{}' is not one of json, postgres, memory", other),
                ))
            }
        };

        let initial_weight = match var("INITIAL_WEIGHT") {
            Some(raw) => quest_tracker_core::input::parse_weight(&raw)
                .map_err(|e| ConfigError::InvalidValue("INITIAL_WEIGHT".to_string(), e.to_string()))?,
            None => DEFAULT_WEIGHT,
        };

        Ok(Self {
            bind_address,
            log_level,
            storage,
            initial_weight,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_json_file() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage, StorageBackend::JsonFile(PathBuf::from("data.json")));
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.initial_weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = Config::from_lookup(lookup(&[("STORAGE_BACKEND", "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));

        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/quests"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Postgres("postgres://localhost/quests".to_string())
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("STORAGE_BACKEND", "redis")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BIND_ADDRESS", "nowhere")])).is_err());
        assert!(Config::from_lookup(lookup(&[("RUST_LOG", "chatty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("INITIAL_WEIGHT", "-1")])).is_err());
    }
}
