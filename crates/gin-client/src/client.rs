//! HTTP connection settings and the shared OpenGIN client.

use std::time::Duration;

/// Errors from store operations that are surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Endpoints of the remote store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base of the ingestion (write) API, e.g. `http://localhost:8080/entities`.
    pub ingestion_url: String,
    /// Base of the read API, e.g. `http://localhost:8081/v1/entities`.
    pub read_url: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ingestion_url: "http://localhost:8080/entities".to_string(),
            read_url: "http://localhost:8081/v1/entities".to_string(),
            timeout: None,
        }
    }
}

/// Client for the OpenGIN ingestion and read APIs.
///
/// Clone is cheap (the inner `reqwest::Client` is reference counted).
#[derive(Debug, Clone)]
pub struct GinClient {
    http: reqwest::Client,
    ingestion_url: String,
    read_url: String,
}

impl GinClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        tracing::debug!(
            ingestion_url = %config.ingestion_url,
            read_url = %config.read_url,
            "OpenGIN client configured"
        );

        Ok(Self {
            http,
            ingestion_url: trim_base(&config.ingestion_url),
            read_url: trim_base(&config.read_url),
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// URL for creating entities.
    pub fn create_url(&self) -> &str {
        &self.ingestion_url
    }

    /// URL for updating the entity with the given id.
    pub fn entity_url(&self, entity_id: &str) -> String {
        format!("{}/{}", self.ingestion_url, entity_id)
    }

    /// URL of the read-side search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.read_url)
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
