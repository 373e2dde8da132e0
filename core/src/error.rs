//! Error types for the Estuary client.
//!
//! # Design
//! Only 4xx responses are turned into an HTTP error (`Client`). Server errors
//! are handed back as parsed JSON, so there is no variant for them. Transport
//! and codec failures keep the underlying message as text so the error stays
//! independent of which HTTP stack produced it.

use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by the executor and every endpoint group.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a 4xx status.
    #[error("{method} request to {path} failed, error: {}", .message.as_deref().unwrap_or("undefined"))]
    Client {
        method: HttpMethod,
        path: String,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },

    /// The request never produced a response (connect, TLS, body read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body was not JSON or did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status-family check used by callers that only care about rejections.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Client { .. })
    }
}
