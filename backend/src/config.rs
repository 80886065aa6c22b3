//! Runtime configuration read from the environment.
//!
//! `load` first lets `dotenvy` pull an optional `.env` file into the process
//! environment, then reads the variables below. Anything unset falls back to a
//! default suitable for running locally.
//!
//! | Variable        | Default            |
//! |-----------------|--------------------|
//! | `HOST`          | `127.0.0.1`        |
//! | `PORT`          | `5000`             |
//! | `DATABASE_PATH` | `agentlist.sqlite` |
//! | `APP_ENV`       | `production`       |
//! | `MAX_UPLOAD_MB` | `5`                |

use std::env;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_PATH: &str = "agentlist.sqlite";
const DEFAULT_ENVIRONMENT: &str = "production";
const DEFAULT_MAX_UPLOAD_MB: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub environment: String,
    pub max_upload_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Loads `.env` (if present) and builds the config from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(value) => parse_number::<u16>("PORT", value)?,
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_MB") {
            Some(value) => parse_number::<u64>("MAX_UPLOAD_MB", value)? * 1024 * 1024,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            max_upload_bytes,
        })
    }

    /// Development mode echoes internal error detail back to the client.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Upload limit in whole megabytes, as shown in error messages.
    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_bytes / (1024 * 1024)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { name, value })
}
