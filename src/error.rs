use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::config::CREDENTIAL_ENV;
use crate::relay::OutboundResponse;
use crate::upstream::UpstreamError;

pub const EXAMPLE_PROMPT: &str = "Describe a desert creature";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid JSON body: {0}")]
    BadRequest(String),
    #[error("request body could not be read: {detail}")]
    UnreadableBody { status: StatusCode, detail: String },
    #[error("missing prompt")]
    MissingPrompt,
    #[error("no upstream credential configured")]
    MissingCredential,
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, detail: String },
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),
    #[error("{0}")]
    Server(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) | RelayError::MissingPrompt => StatusCode::BAD_REQUEST,
            RelayError::UnreadableBody { status, .. } => *status,
            RelayError::MissingCredential | RelayError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn into_outbound(self) -> OutboundResponse {
        let status = self.status();
        let body = match self {
            RelayError::BadRequest(detail) => json!({
                "error": "Invalid JSON body",
                "detail": detail,
            }),
            RelayError::UnreadableBody { detail, .. } => json!({
                "error": "Unreadable request body",
                "detail": detail,
            }),
            RelayError::MissingPrompt => json!({
                "error": "Missing prompt",
                "example": { "prompt": EXAMPLE_PROMPT },
            }),
            RelayError::MissingCredential => json!({
                "error": format!("Missing {CREDENTIAL_ENV}"),
                "hint": format!(
                    "Set {CREDENTIAL_ENV} in the service environment (e.g. your host's \
                     environment variable settings), then restart or redeploy."
                ),
            }),
            RelayError::Upstream { status, detail } => json!({
                "error": "OpenAI error",
                "status": status.as_u16(),
                "detail": detail,
            }),
            RelayError::MethodNotAllowed(_) => json!({
                "error": "Use GET (health) or POST with { \"prompt\": \"...\" }",
            }),
            RelayError::Server(detail) => json!({
                "error": "Server error",
                "detail": detail,
            }),
        };

        OutboundResponse::json(status, body)
    }
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        RelayError::Server(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        self.into_outbound().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(RelayError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MissingPrompt.status(), StatusCode::BAD_REQUEST);
        let oversized = RelayError::UnreadableBody {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: "length limit exceeded".into(),
        };
        assert_eq!(oversized.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            RelayError::MissingCredential.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let upstream = RelayError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            detail: "slow down".into(),
        };
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            RelayError::MethodNotAllowed(Method::PUT).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn upstream_body_carries_status_verbatim() {
        let outbound = RelayError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            detail: "{\"error\":\"bad key\"}".into(),
        }
        .into_outbound();
        let body = outbound.body.unwrap();
        assert_eq!(body["status"], 401);
        assert_eq!(body["detail"], "{\"error\":\"bad key\"}");
    }

    #[test]
    fn missing_credential_hint_names_the_variable() {
        let body = RelayError::MissingCredential.into_outbound().body.unwrap();
        assert_eq!(body["error"], "Missing OPENAI_API_KEY");
        assert!(body["hint"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }
}
