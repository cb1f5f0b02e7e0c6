mod client;
mod types;

use async_trait::async_trait;
use axum::http::StatusCode;
use secrecy::Secret;
use thiserror::Error;

pub use client::OpenAiResponsesClient;
pub use types::{ContentPart, InputMessage, Role, UpstreamRequest};

/// Substituted when a non-success upstream body cannot be read.
pub const NO_BODY: &str = "(no body)";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(String),
}

/// Status and raw body text of one upstream exchange.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// `None` when reading the body failed.
    pub body: Option<String>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    pub fn body_or_sentinel(&self) -> &str {
        self.body.as_deref().unwrap_or(NO_BODY)
    }
}

/// A single, non-retrying call to the text-generation endpoint.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn send(
        &self,
        credential: &Secret<String>,
        request: &UpstreamRequest,
    ) -> Result<UpstreamResponse, UpstreamError>;
}
