//! Client configuration.
//!
//! Loaded from a small TOML file:
//! ```toml
//! proxy_url = "https://proxy.golang.org"
//! timeout_secs = 30
//! user_agent = "discovery/0.1"
//! ```
//! Every key is optional. `DISCOVERY_PROXY_URL` overrides `proxy_url`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, Result};

/// Default module proxy.
pub const DEFAULT_PROXY_URL: &str = "https://proxy.golang.org";

/// Environment variable overriding the configured proxy URL.
pub const PROXY_URL_ENV: &str = "DISCOVERY_PROXY_URL";

/// Proxy client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the module proxy.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Per-request timeout applied by the HTTP transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            proxy_url: default_proxy_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ProxyError::Config {
            detail: format!("reading {}: {e}", path.display()),
        })?;
        ClientConfig::parse(&content)
    }

    /// Replace the proxy URL when an override is given.
    pub fn with_proxy_url(mut self, proxy_url: Option<String>) -> Result<Self> {
        if let Some(url) = proxy_url {
            self.proxy_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    /// Apply the `DISCOVERY_PROXY_URL` override from the environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        let url = std::env::var(PROXY_URL_ENV).ok().filter(|u| !u.is_empty());
        self.with_proxy_url(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The proxy URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.proxy_url.trim_end_matches('/')
    }

    fn validate(&self) -> Result<()> {
        if !(self.proxy_url.starts_with("http://") || self.proxy_url.starts_with("https://")) {
            return Err(ProxyError::Config {
                detail: format!("proxy_url must be an http(s) URL, got {:?}", self.proxy_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ProxyError::Config {
                detail: "timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}
