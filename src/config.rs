//! Runtime configuration loaded once from the environment (and `.env`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::paperless::models::{RetrievalLimits, DEFAULT_MAX_DOCUMENTS, DEFAULT_SNIPPET_LENGTH};

const DEFAULT_PAPERLESS_URL: &str = "https://paperless.yourdomain.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    InvalidNumber {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Connection settings and default limits for the Paperless instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperlessConfig {
    pub base_url: String,
    pub token: String,
    /// Maximum characters per document snippet.
    pub snippet_length: usize,
    /// Maximum number of snippets returned per search.
    pub max_snippets: usize,
    pub request_timeout: Duration,
}

impl Default for PaperlessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PAPERLESS_URL.to_string(),
            token: String::new(),
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            max_snippets: DEFAULT_MAX_DOCUMENTS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PaperlessConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn limits(&self) -> RetrievalLimits {
        RetrievalLimits {
            max_documents: self.max_snippets,
            snippet_length: self.snippet_length,
        }
    }

    /// Read `PAPERLESS_*`, `SNIPPET_LENGTH` and `MAX_SNIPPETS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PAPERLESS_URL").unwrap_or_else(|| {
            log::warn!(
                "PAPERLESS_URL not set, using default {}",
                DEFAULT_PAPERLESS_URL
            );
            DEFAULT_PAPERLESS_URL.to_string()
        });
        let token = lookup("PAPERLESS_TOKEN").unwrap_or_else(|| {
            log::warn!("PAPERLESS_TOKEN not set, requests will be sent without a valid token");
            String::new()
        });

        Ok(Self {
            base_url,
            token,
            snippet_length: parse_var(
                &lookup,
                "SNIPPET_LENGTH",
                "non-negative integer",
                DEFAULT_SNIPPET_LENGTH,
            )?,
            max_snippets: parse_var(
                &lookup,
                "MAX_SNIPPETS",
                "non-negative integer",
                DEFAULT_MAX_DOCUMENTS,
            )?,
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "PAPERLESS_TIMEOUT_SECS",
                "number of seconds",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Where the MCP endpoint listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: lookup("MCP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: parse_var(&lookup, "PORT", "port number", DEFAULT_PORT)?,
        })
    }
}

fn parse_var<F, T>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                name,
                expected,
                value,
            }),
    }
}
