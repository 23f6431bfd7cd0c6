//! Content API transport
//!
//! `ContentSource` is the seam between the content client and the network.
//! `StrapiSource` talks HTTP to a Strapi-style REST API with reqwest.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::StrapiConfig;

/// Transport-level failure of a content request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),
    /// Non-success HTTP status other than 404
    #[error("Content API returned HTTP {0}")]
    Status(u16),
    /// HTTP 404
    #[error("Content not found")]
    NotFound,
    /// Body was not the expected JSON envelope
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Raw access to the content API
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// GET `<api>/<path>` with the given query pairs, returning the JSON body
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value, FetchError>;
}

/// HTTP content source for a Strapi-style API
pub struct StrapiSource {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl StrapiSource {
    /// Build a source from configuration
    pub fn new(config: &StrapiConfig) -> anyhow::Result<Self> {
        let user_agent = format!("gameloop/{}", env!("CARGO_PKG_VERSION"));
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build content API HTTP client")?;

        let api_token = Some(config.api_token.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self {
            client,
            api_url: format!("{}/api", config.url.trim_end_matches('/')),
            api_token,
        })
    }

    pub fn boxed(self) -> Arc<dyn ContentSource> {
        Arc::new(self)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl ContentSource for StrapiSource {
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        tracing::debug!(%url, params = params.len(), "Fetching content");

        let mut request = self
            .client
            .get(&url)
            .query(params)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
