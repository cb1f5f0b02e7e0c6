use std::{any::Any, sync::Arc};

use axum::{
    Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, HeaderValue, Method, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, warn};

use crate::{
    config::AppConfig,
    error::RelayError,
    relay::{InboundBody, InboundRequest, OutboundResponse, PromptRelayHandler},
    upstream::OpenAiResponsesClient,
};

pub fn build_router(config: &AppConfig) -> Router {
    let upstream = Arc::new(OpenAiResponsesClient::new(&config.upstream_base));
    let handler = PromptRelayHandler::new(config.relay.clone(), upstream);
    router_with(&config.route, handler)
}

/// Mounts `handler` on `route` for every method.
pub fn router_with(route: &str, handler: PromptRelayHandler) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(route, any(relay))
        .with_state(handler)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn relay(
    State(handler): State<PromptRelayHandler>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> OutboundResponse {
    let body = match body {
        Ok(bytes) => bytes,
        // Only POST reads the body; other methods dispatch without it.
        Err(rejection) if method == Method::POST => {
            warn!(status = %rejection.status(), "request body rejected");
            return RelayError::UnreadableBody {
                status: rejection.status(),
                detail: rejection.body_text(),
            }
            .into_outbound();
        }
        Err(_) => Bytes::new(),
    };

    handler
        .handle(InboundRequest {
            method,
            headers,
            body: InboundBody::Raw(body),
        })
        .await
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!(%detail, "relay handler panicked");
    RelayError::Server(detail).into_response()
}
