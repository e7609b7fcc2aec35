//! Process configuration, read once from the environment (`CAFE_` prefix).

use figment::{Figment, providers::Env};
use serde::Deserialize;

use crate::error::CafeError;

pub const DEFAULT_DATABASE_NAME: &str = "breakthrough_cafe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection string for the content store. Required, but only at the
    /// first `connect()` so a misconfigured process can still serve
    /// `/api/health`.
    pub database_url: Option<String>,
    /// Database file name, applied when `database_url` points at a directory.
    pub database_name: String,
    /// Affects the default log filter only, never behavior.
    pub environment: Environment,
    /// Explicit log filter override; `RUST_LOG` still wins over both.
    pub loglevel: Option<String>,
    pub bind_addr: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// At least 64 bytes of key material for the session cookie key.
    /// Absent means a random per-process key.
    pub session_secret: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            environment: Environment::Development,
            loglevel: None,
            bind_addr: "0.0.0.0:8000".to_string(),
            admin_username: None,
            admin_password: None,
            session_secret: None,
            max_connections: 5,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, CafeError> {
        Figment::new()
            .merge(Env::prefixed("CAFE_"))
            .extract()
            .map_err(|e| CafeError::Configuration(e.to_string()))
    }

    /// Default tracing filter: explicit `loglevel` wins, otherwise the
    /// environment picks between `debug` and `info`.
    pub fn log_filter(&self) -> String {
        self.loglevel.clone().unwrap_or_else(|| {
            match self.environment {
                Environment::Development => "debug",
                Environment::Production => "info",
            }
            .to_string()
        })
    }

    /// Resolve the effective sqlx connection string.
    ///
    /// `database_url` is required. When it points at a directory (trailing
    /// `/`), `database_name` supplies the file name; otherwise it is used
    /// verbatim. A missing `sqlite:` scheme is added.
    pub fn storage_url(&self) -> Result<String, CafeError> {
        let raw = self
            .database_url
            .as_deref()
            .ok_or_else(|| CafeError::Configuration("CAFE_DATABASE_URL is not set".to_string()))?;
        if raw.is_empty() {
            return Err(CafeError::Configuration(
                "CAFE_DATABASE_URL is empty".to_string(),
            ));
        }

        let mut url = if raw.ends_with('/') {
            format!("{raw}{}.db", self.database_name)
        } else {
            raw.to_string()
        };
        if !url.starts_with("sqlite:") {
            url = format!("sqlite:{url}");
        }
        Ok(url)
    }
}
