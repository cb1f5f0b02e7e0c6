use std::sync::Arc;

use axum::http::{
    Method, StatusCode,
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ORIGIN,
    },
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{
    config::RelayConfig,
    error::RelayError,
    relay::{
        InboundBody, InboundRequest, OutboundResponse, PromptPayload,
        extract::{NO_REPLY_NOTE, ReplyShape, top_level_keys},
    },
    upstream::{UpstreamClient, UpstreamRequest},
};

pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Result of a POST that reached the upstream successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Reply(String),
    /// The call succeeded but none of the known shapes carried text.
    NoUsableReply { keys: Vec<String> },
}

impl RelayOutcome {
    pub fn into_outbound(self) -> OutboundResponse {
        let body = match self {
            RelayOutcome::Reply(reply) => json!({ "reply": reply }),
            RelayOutcome::NoUsableReply { keys } => json!({
                "reply": Value::Null,
                "note": NO_REPLY_NOTE,
                "keys": keys,
            }),
        };
        OutboundResponse::json(StatusCode::OK, body)
    }
}

#[derive(Clone)]
pub struct PromptRelayHandler {
    config: Arc<RelayConfig>,
    upstream: Arc<dyn UpstreamClient>,
}

impl PromptRelayHandler {
    pub fn new(config: RelayConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn handle(&self, request: InboundRequest) -> OutboundResponse {
        debug!(
            method = %request.method,
            origin = ?request.headers.get(ORIGIN),
            "relay request"
        );

        let response = match request.method {
            Method::OPTIONS => preflight(),
            Method::GET => self.health(),
            Method::POST => match self.relay(request.body).await {
                Ok(outcome) => outcome.into_outbound(),
                Err(err) => {
                    log_failure(&err);
                    err.into_outbound()
                }
            },
            other => RelayError::MethodNotAllowed(other).into_outbound(),
        };

        response.with_header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
    }

    fn health(&self) -> OutboundResponse {
        OutboundResponse::json(
            StatusCode::OK,
            json!({ "ok": true, "hasKey": self.config.has_well_formed_key() }),
        )
    }

    pub async fn relay(&self, body: InboundBody) -> Result<RelayOutcome, RelayError> {
        let payload = PromptPayload::from_body(body)?;
        let credential = self
            .config
            .credential
            .as_ref()
            .ok_or(RelayError::MissingCredential)?;

        let request = UpstreamRequest::new(
            &self.config.model,
            &self.config.system_instruction,
            &payload.prompt,
        );
        let response = self.upstream.send(credential, &request).await?;

        if !response.status.is_success() {
            return Err(RelayError::Upstream {
                status: response.status,
                detail: response.body_or_sentinel().to_string(),
            });
        }

        let text = response
            .body
            .ok_or_else(|| RelayError::Server("upstream response body could not be read".into()))?;
        let data: Value = serde_json::from_str(&text)
            .map_err(|err| RelayError::Server(format!("invalid upstream JSON: {err}")))?;

        match ReplyShape::extract_first(&data) {
            Some((shape, reply)) => {
                info!(?shape, chars = reply.chars().count(), "relayed reply");
                Ok(RelayOutcome::Reply(reply.to_string()))
            }
            None => {
                let keys = top_level_keys(&data);
                warn!(?keys, "upstream response carried no usable text");
                Ok(RelayOutcome::NoUsableReply { keys })
            }
        }
    }
}

fn preflight() -> OutboundResponse {
    OutboundResponse::empty(StatusCode::NO_CONTENT)
        .with_header(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS)
        .with_header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS)
}

fn log_failure(err: &RelayError) {
    match err {
        RelayError::BadRequest(_)
        | RelayError::UnreadableBody { .. }
        | RelayError::MissingPrompt => {
            info!(error = %err, "rejected relay request");
        }
        RelayError::Upstream { status, .. } => {
            warn!(%status, "upstream returned non-success status");
        }
        RelayError::MissingCredential | RelayError::Server(_) => {
            tracing::error!(error = %err, "relay failed");
        }
        RelayError::MethodNotAllowed(_) => {}
    }
}
