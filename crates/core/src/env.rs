//! Environment settings accessor.
//!
//! Settings are read from process environment variables once, installed as a
//! process-wide read-only value before any request is served, and never
//! mutated afterwards. Collaborator services receive everything else via
//! explicit constructor injection; only the environment keeps a global
//! accessor because it is immutable after startup.

use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static CURRENT: OnceLock<Environment> = OnceLock::new();

/// Deployment flavor of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEnv {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl FromStr for RuntimeEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::invalid(
                "APP_ENV",
                format!("unknown environment `{other}`"),
            )),
        }
    }
}

/// Process-wide application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub environment: RuntimeEnv,
}

impl Environment {
    /// Read settings from `APP_NAME`, `APP_HOST`, `APP_PORT`, `APP_DEBUG` and
    /// `APP_ENV`, with development-friendly defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let name = std::env::var("APP_NAME").unwrap_or_else(|_| "chassis".to_string());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("APP_PORT", e.to_string()))?,
            Err(_) => 8080,
        };

        let debug = match std::env::var("APP_DEBUG") {
            Ok(raw) => matches!(raw.as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        };

        let environment = match std::env::var("APP_ENV") {
            Ok(raw) => raw.parse()?,
            Err(_) => RuntimeEnv::Development,
        };

        Ok(Self {
            name,
            host,
            port,
            debug,
            environment,
        })
    }

    /// Install the process-wide environment. The first call wins; later calls
    /// are no-ops (matching "initialized once, never mutated").
    pub fn prepare(env: Environment) {
        let _ = CURRENT.set(env);
    }

    /// The prepared process-wide environment.
    pub fn current() -> Result<&'static Environment, ConfigError> {
        CURRENT.get().ok_or(ConfigError::EnvNotPrepared)
    }
}
