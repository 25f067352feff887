use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatabaseBackend { MongoDB, Memory }

impl FromStr for DatabaseBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(DatabaseBackend::MongoDB),
            "memory" => Ok(DatabaseBackend::Memory),
            other => Err(format!("unknown backend {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_backend: DatabaseBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt_secret: String,
    pub upload_dir: String,
    pub poll_close_interval_secs: u64,
}

impl Config {
    /// Reads the process environment, after loading `.env` when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            port: try_load(&lookup, "PORT", "8080")?,
            database_backend: try_load(&lookup, "DATABASE_BACKEND", "mongodb")?,
            mongodb_uri: try_load(&lookup, "MONGODB_URI", "mongodb://localhost:27017")?,
            mongodb_database: try_load(&lookup, "MONGODB_DATABASE", "segreto")?,
            jwt_secret,
            upload_dir: try_load(&lookup, "UPLOAD_DIR", "./uploads")?,
            poll_close_interval_secs: try_load(&lookup, "POLL_CLOSE_INTERVAL_SECS", "300")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{} not set, using default: {}", key, default);
        default.to_string()
    });

    value.parse().map_err(|error: T::Err| {
        log::warn!("Invalid {} value: {}", key, error);
        ConfigError::Invalid { key, value: value.clone(), reason: error.to_string() }
    })
}
