//! # Backend API boundary
//!
//! Everything that talks to the remote adventure service goes through the
//! [`Backend`] trait. [`HttpBackend`] is the real implementation; tests plug in
//! doubles that fail or answer from a fixed table.
//!
//! Backend replies are normalized here before anyone else sees them:
//!
//! - a body with a boolean `success` field is an envelope: `false` becomes
//!   [`ApiError::Rejected`], `true` yields its `data` field
//! - any other JSON body is the payload itself
//!
//! [`parse`] then deserializes the payload into a typed DTO so callers never
//! poke at raw JSON.

pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpBackend;

/// Failure classes for a backend call. Callers in [`crate::adventure`] treat all
/// of them the same way: log and substitute fallback content.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend is switched off in configuration.
    #[error("backend disabled by configuration")]
    Disabled,

    #[error("request timed out after {0}s")]
    Timeout(u32),

    /// Connection refused, DNS failure, broken body stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status, with whatever message the body carried.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Envelope with `success: false`.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("could not decode backend response: {0}")]
    Decode(String),

    /// Payload parsed but held nothing usable.
    #[error("backend returned no data")]
    Empty,
}

/// Transport seam for the backend service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET `path` (relative to the configured base URL, query string included).
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// POST `body` as JSON to `path`.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        (**self).post(path, body).await
    }
}

/// Strip the `{ success, data }` envelope if present.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    let success = body.get("success").and_then(Value::as_bool);
    match success {
        Some(false) => Err(ApiError::Rejected(
            extract_error_message(&body).unwrap_or_else(|| "Error desconocido".to_string()),
        )),
        Some(true) => match body {
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Null) | None => Ok(Value::Object(map)),
                Some(data) => Ok(data),
            },
            other => Ok(other),
        },
        None => Ok(body),
    }
}

/// Unwrap the envelope and deserialize the payload into `T`.
pub fn parse<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let payload = unwrap_envelope(body)?;
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Best-effort human message from an error body: `detail`, then `message`, then `error`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Build `path?key=value` with the value URL-encoded.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    format!("{}?{}={}", path, key, urlencoding::encode(value))
}
