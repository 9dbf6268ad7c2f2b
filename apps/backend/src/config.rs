//! Service configuration read from the environment.

use std::time::Duration;

use prepoflex_core::DEFAULT_BATCH_SIZE;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Runtime settings for the server and the card generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub batch_size: usize,
    pub generator_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            generator_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    /// Read settings from process environment variables.
    ///
    /// Recognised keys:
    /// - GEMINI_API_KEY (or API_KEY): generator credentials
    /// - GEMINI_MODEL, GEMINI_BASE_URL: generator endpoint
    /// - BATCH_SIZE: cards per generator call
    /// - GENERATOR_TIMEOUT_SECS: HTTP timeout for generator calls
    /// - HOST, PORT: listen address
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let batch_size = match get("BATCH_SIZE") {
            Some(v) => parse_positive("BATCH_SIZE", &v)? as usize,
            None => defaults.batch_size,
        };
        let generator_timeout = match get("GENERATOR_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("GENERATOR_TIMEOUT_SECS", &v)?),
            None => defaults.generator_timeout,
        };
        let port = match get("PORT") {
            Some(v) => u16::try_from(parse_positive("PORT", &v)?).map_err(|_| {
                ConfigError::InvalidNumber {
                    key: "PORT",
                    value: v.clone(),
                }
            })?,
            None => defaults.port,
        };

        Ok(Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: get("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            batch_size,
            generator_timeout,
            host: get("HOST").unwrap_or(defaults.host),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}
