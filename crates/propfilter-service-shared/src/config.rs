//! Service configuration.
//!
//! # Environment Variables
//!
//! - `APP_ENV`: `development` (default) enables verbose error responses; any
//!   other value selects production mode
//! - `PORT`: HTTP port (default: 3000)
//! - `BODY_LIMIT_BYTES`: Maximum request body size (default: 102400)
//! - `SIMULATE_STEP_FAILURE`: `true` makes every filter step reject (default: false)
//! - `DOTENV_PATH`: dotenv file loaded by [`load_dotenv`] (default: `variables.env`)

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use propfilter_lib::FilterStep;

/// Default dotenv file read at startup.
pub const DEFAULT_DOTENV_PATH: &str = "variables.env";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request body limit in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value '{value}'")]
    InvalidPort { value: String },

    #[error("invalid BODY_LIMIT_BYTES value '{value}'")]
    InvalidBodyLimit { value: String },

    #[error("invalid boolean '{value}' for {name}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("failed to load dotenv file {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Process mode. Controls how much detail error responses carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Only the exact string `development` selects development mode.
    pub fn parse(value: &str) -> Self {
        if value == "development" {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Runtime configuration for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub environment: Environment,
    pub port: u16,
    pub body_limit: usize,
    pub simulate_step_failure: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
            simulate_step_failure: false,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(defaults.environment);

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => defaults.port,
        };

        let body_limit = match lookup("BODY_LIMIT_BYTES") {
            Some(value) => match value.trim().parse() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidBodyLimit { value }),
            },
            None => defaults.body_limit,
        };

        let simulate_step_failure = match lookup("SIMULATE_STEP_FAILURE") {
            Some(value) => parse_flag("SIMULATE_STEP_FAILURE", value)?,
            None => defaults.simulate_step_failure,
        };

        Ok(Self {
            environment,
            port,
            body_limit,
            simulate_step_failure,
        })
    }

    /// Address to bind: all interfaces on the configured port.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Filter step matching this configuration.
    pub fn filter_step(&self) -> FilterStep {
        if self.simulate_step_failure {
            FilterStep::failing()
        } else {
            FilterStep::default()
        }
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

/// Load the dotenv file named by `DOTENV_PATH`, or `variables.env`.
///
/// Variables already set in the environment win. A missing file is not an
/// error; the returned path is `None` in that case.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    let path = std::env::var("DOTENV_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOTENV_PATH));

    match dotenvy::from_path(&path) {
        Ok(()) => Ok(Some(path)),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Dotenv { path, source }),
    }
}
