use axum::{
    Json,
    body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::error::RelayError;

/// Request body as delivered by the host: raw bytes or an already-parsed document.
#[derive(Debug, Clone)]
pub enum InboundBody {
    Raw(Bytes),
    Parsed(Value),
}

impl InboundBody {
    pub fn raw(text: impl Into<Bytes>) -> Self {
        InboundBody::Raw(text.into())
    }

    pub fn empty() -> Self {
        InboundBody::Raw(Bytes::new())
    }
}

#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: InboundBody,
}

impl InboundRequest {
    pub fn new(method: Method, body: InboundBody) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub prompt: String,
}

impl PromptPayload {
    /// Parses (or passes through) the body and returns the trimmed prompt.
    ///
    /// An empty raw body is read as `{}`. Malformed JSON is a `BadRequest`,
    /// a blank or absent prompt is a `MissingPrompt`.
    pub fn from_body(body: InboundBody) -> Result<Self, RelayError> {
        let document = match body {
            InboundBody::Raw(bytes) if bytes.is_empty() => Value::Object(Map::new()),
            InboundBody::Raw(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| RelayError::BadRequest(err.to_string()))?,
            InboundBody::Parsed(value) => value,
        };

        let prompt = coerce_to_text(document.get("prompt"));
        let prompt = prompt.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if prompt.is_empty() {
            return Err(RelayError::MissingPrompt);
        }

        Ok(Self {
            prompt: prompt.to_string(),
        })
    }
}

/// Falsy values (`null`, `false`, zero, `""`) and empty arrays coerce to nothing.
fn coerce_to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl OutboundResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, self.headers, Json(body)).into_response(),
            None => (self.status, self.headers).into_response(),
        }
    }
}
