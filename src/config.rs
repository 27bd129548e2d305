//! Service configuration
//!
//! Values come from CLI flags first, then environment variables, then
//! defaults.

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Default backend when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the backend URL
pub const URL_ENV: &str = "POSTGATE_URL";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "POSTGATE_TIMEOUT_SECS";

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Root URL of the backend (e.g. `https://social.example.com`)
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Resolve configuration from optional overrides and the environment
    pub fn resolve(url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        let raw_url = url
            .map(String::from)
            .or_else(|| env::var(URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let base_url = Url::parse(&raw_url)
            .map_err(|e| Error::Config(format!("invalid backend URL {raw_url:?}: {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "backend URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let timeout_secs = match timeout_secs {
            Some(secs) => secs,
            None => match env::var(TIMEOUT_ENV) {
                Ok(raw) => raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{TIMEOUT_ENV} must be a number, got {raw:?}"))
                })?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
        };

        if timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least one second".to_string()));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Join an API path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Local submission policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// Refuse drafts that have no attached image
    pub require_media: bool,
}
