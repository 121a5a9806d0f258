//! Network boundary: send a request to the generation service.
//!
//! The orchestrator only ever sees the [`BlogService`] trait, so tests and
//! embedders can swap the HTTP transport for anything that produces a JSON
//! payload. [`HttpBlogService`] is the production implementation.
//!
//! ## Failure mapping
//!
//! | What happened | Error |
//! |---------------|-------|
//! | connect failure, DNS, timeout, body read aborted | [`BlogGenError::Transport`] |
//! | non-2xx status (optional `{ "detail": … }` body) | [`BlogGenError::Server`] |
//! | 2xx whose body is not JSON | [`BlogGenError::Normalization`] |
//!
//! Exactly one attempt is made per call. Generation is expensive on the
//! service side and not idempotent, so a retry here would bill the user
//! twice for one click.

use crate::config::ClientConfig;
use crate::error::BlogGenError;
use crate::pipeline::request::GenerationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Anything that can turn a [`GenerationRequest`] into a raw JSON response.
#[async_trait]
pub trait BlogService: Send + Sync {
    /// Send `request` once and return the response body.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, BlogGenError>;
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<String>,
}

/// [`BlogService`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpBlogService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBlogService {
    /// Build the HTTP client from `config`.
    ///
    /// # Errors
    /// [`BlogGenError::Internal`] if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, BlogGenError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BlogGenError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask the service whether it is up.
    pub async fn health(&self) -> Result<HealthStatus, BlogGenError> {
        let url = self.config.endpoint("/health");
        debug!("Health check: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(server_error(status.as_u16(), &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| BlogGenError::Normalization {
            reason: format!("health response is not valid JSON: {e}"),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> BlogGenError {
        let reason = if e.is_timeout() {
            format!(
                "Request timed out after {}s. The service may be busy; try again.",
                self.config.timeout_secs
            )
        } else if e.is_connect() {
            format!(
                "Could not reach the blog service at {}. Check the API URL.",
                self.config.api_url
            )
        } else {
            e.to_string()
        };
        BlogGenError::Transport { reason }
    }
}

#[async_trait]
impl BlogService for HttpBlogService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, BlogGenError> {
        let url = self.config.endpoint(request.kind().endpoint());
        let start = Instant::now();
        info!(
            "Requesting {} blog in {} from {}",
            request.kind(),
            request.language(),
            url
        );

        let response = self
            .client
            .post(&url)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!("{} returned HTTP {} after {}ms", url, status, elapsed_ms);
            return Err(server_error(status.as_u16(), &bytes));
        }

        info!("{} answered in {}ms ({} bytes)", url, elapsed_ms, bytes.len());
        serde_json::from_slice(&bytes).map_err(|e| BlogGenError::Normalization {
            reason: format!("response body is not valid JSON: {e}"),
        })
    }
}

/// Build a [`BlogGenError::Server`], lifting a string `detail` out of the
/// body when there is one. Anything else in the body is ignored.
fn server_error(status: u16, body: &[u8]) -> BlogGenError {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(String::from));
    BlogGenError::Server { status, detail }
}
