//! Client configuration.
//!
//! Every knob lives in [`ClientConfig`], built via [`ClientConfigBuilder`].
//! The builder lets callers set only what they care about and rely on the
//! documented defaults for the rest; [`ClientConfigBuilder::build`] is the
//! single place where values are checked.

use crate::error::BlogGenError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable overriding [`ClientConfig::api_url`].
pub const ENV_API_URL: &str = "BLOGGEN_API_URL";

/// Environment variable overriding [`ClientConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "BLOGGEN_TIMEOUT_SECS";

/// Configuration for talking to the blog generation service.
///
/// # Example
/// ```rust
/// use bloggen::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_url("https://blogs.example.net")
///     .timeout_secs(90)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint("/blogs/topic"), "https://blogs.example.net/blogs/topic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the generation service, without a trailing slash.
    /// Default: `http://localhost:8000`.
    pub api_url: String,

    /// Whole-request timeout in seconds. Default: 120.
    ///
    /// A single generation routinely takes 30–60 s (title, body, and an
    /// optional translation pass on the service side). The timeout has to
    /// clear that comfortably; there is no retry to fall back on.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// How long a toast stays visible, in milliseconds. Default: 3000.
    pub toast_duration_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 120,
            user_agent: format!("bloggen/{}", env!("CARGO_PKG_VERSION")),
            toast_duration_ms: 3000,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overlaid with `BLOGGEN_API_URL` / `BLOGGEN_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// [`BlogGenError::InvalidConfig`] when a variable is set but unusable.
    pub fn from_env() -> Result<Self, BlogGenError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                builder = builder.api_url(url);
            }
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                BlogGenError::InvalidConfig(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            builder = builder.timeout_secs(secs);
        }
        builder.build()
    }

    /// Full URL for an endpoint path such as `/blogs/topic`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.api_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn toast_duration_ms(mut self, ms: u64) -> Self {
        self.config.toast_duration_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, BlogGenError> {
        let c = &self.config;
        if !(c.api_url.starts_with("http://") || c.api_url.starts_with("https://")) {
            return Err(BlogGenError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got '{}'",
                c.api_url
            )));
        }
        if c.timeout_secs == 0 {
            return Err(BlogGenError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
