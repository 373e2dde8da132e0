//! Shared request executor used by every endpoint group.
//!
//! # Design
//! Each call is split the same way: `build` turns a path and a
//! `RequestOptions` bag into an `HttpRequest`, the transport performs the
//! round-trip, and `parse` turns the `HttpResponse` into JSON. `build` and
//! `parse` are pure, so tests can cover header injection and status handling
//! without a network.
//!
//! Only 4xx responses fail. A 5xx response is returned as parsed JSON, as if
//! it had succeeded: `request_json` hands it back unchanged and `request`
//! wraps it in `Reply::ServerError` instead of forcing it into the typed
//! shape. It is also logged at `warn`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::transport::{ReqwestTransport, Transport};

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";
const JSON_MIME: &str = "application/json";

/// Method, extra headers and body for one request. Defaults to a bare GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: HttpMethod::Delete,
            ..Self::default()
        }
    }

    pub fn post_json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self {
            method: HttpMethod::Post,
            headers: Vec::new(),
            body: RequestBody::Json(body),
        })
    }

    pub fn post_multipart(file: FilePart) -> Self {
        Self {
            method: HttpMethod::Post,
            headers: Vec::new(),
            body: RequestBody::Multipart(file),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Result of a typed request that was not rejected.
///
/// Server errors (5xx) are not failures; their body rarely has the shape of
/// `T`, so it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    ServerError { status: u16, body: Value },
}

impl<T> Reply<T> {
    pub fn into_ok(self) -> Option<T> {
        match self {
            Reply::Ok(value) => Some(value),
            Reply::ServerError { .. } => None,
        }
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Reply::Ok(value) => Some(value),
            Reply::ServerError { .. } => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Reply::ServerError { .. })
    }

    /// Raw body of a 5xx response.
    pub fn server_error(&self) -> Option<&Value> {
        match self {
            Reply::Ok(_) => None,
            Reply::ServerError { body, .. } => Some(body),
        }
    }

    /// The `error` field of a 5xx body, rendered like a 4xx message.
    pub fn error_message(&self) -> Option<String> {
        self.server_error().and_then(error_field)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok(value) => Reply::Ok(f(value)),
            Reply::ServerError { status, body } => Reply::ServerError { status, body },
        }
    }
}

/// Configuration plus transport, shared by all groups of one client.
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct Executor {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl Executor {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Executor over a default `reqwest` transport.
    pub fn with_reqwest(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for `path`.
    ///
    /// Caller headers come first; `Content-Type` and `Authorization` always
    /// replace any caller-supplied header of the same name. Multipart bodies
    /// get no JSON content type so the transport can set the form boundary.
    pub fn build(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let RequestOptions {
            method,
            headers,
            body,
        } = options;

        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .filter(|(name, _)| {
                !name.eq_ignore_ascii_case(CONTENT_TYPE) && !name.eq_ignore_ascii_case(AUTHORIZATION)
            })
            .collect();
        if !body.is_multipart() {
            headers.push((CONTENT_TYPE.to_string(), JSON_MIME.to_string()));
        }
        headers.push((AUTHORIZATION.to_string(), self.config.bearer()));

        HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url(), path),
            path: path.to_string(),
            headers,
            body,
        }
    }

    /// Decode the body as JSON, then fail if the status is in the 4xx family.
    pub fn parse(
        &self,
        method: HttpMethod,
        path: &str,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        let json = decode_body(&response.body)?;

        match response.status / 100 {
            4 => Err(ApiError::Client {
                method,
                path: path.to_string(),
                message: error_field(&json),
            }),
            5 => {
                warn!(%method, path, status = response.status, "server error returned as success");
                Ok(json)
            }
            _ => Ok(json),
        }
    }

    /// Run one request and return the raw decoded JSON, whatever the 2xx/5xx
    /// status.
    pub async fn request_json(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let (_, json) = self.exchange(path, options).await?;
        Ok(json)
    }

    /// Run one request and decode the JSON into `T`.
    ///
    /// A 5xx body is not decoded; it comes back untouched as
    /// `Reply::ServerError`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Reply<T>, ApiError> {
        let (status, json) = self.exchange(path, options).await?;
        if status / 100 == 5 {
            return Ok(Reply::ServerError { status, body: json });
        }
        serde_json::from_value(json)
            .map(Reply::Ok)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    async fn exchange(&self, path: &str, options: RequestOptions) -> Result<(u16, Value), ApiError> {
        let request = self.build(path, options);
        let method = request.method;
        let response = self.transport.send(request).await?;
        let status = response.status;
        debug!(%method, path, status, "estuary request");
        let json = self.parse(method, path, response)?;
        Ok((status, json))
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Empty bodies (e.g. `202` on delete) decode as `null`.
fn decode_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn error_field(json: &Value) -> Option<String> {
    match json.get("error")? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
