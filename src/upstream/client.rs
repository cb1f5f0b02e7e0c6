use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, error};

use crate::upstream::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Client for the OpenAI Responses endpoint (`{base}/responses`).
#[derive(Debug, Clone)]
pub struct OpenAiResponsesClient {
    http: Client,
    endpoint: String,
}

impl OpenAiResponsesClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UpstreamClient for OpenAiResponsesClient {
    async fn send(
        &self,
        credential: &Secret<String>,
        request: &UpstreamRequest,
    ) -> Result<UpstreamResponse, UpstreamError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "calling upstream");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "upstream transport failure");
                UpstreamError::Transport(err.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.ok();

        Ok(UpstreamResponse { status, body })
    }
}
