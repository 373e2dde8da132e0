//! Pin management endpoints.

use std::fmt::Display;

use serde_json::Value;

use crate::error::ApiError;
use crate::request::{Executor, Reply, RequestOptions};
use crate::types::{AddPin, Pin, PinList};

/// `/pinning/pins` endpoints.
#[derive(Debug, Clone)]
pub struct PinningClient {
    executor: Executor,
}

impl PinningClient {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn list_pins(&self) -> Result<Reply<PinList>, ApiError> {
        self.executor
            .request("/pinning/pins", RequestOptions::get())
            .await
    }

    pub async fn add_pin(&self, pin: &AddPin) -> Result<Reply<Pin>, ApiError> {
        self.executor
            .request("/pinning/pins", RequestOptions::post_json(pin)?)
            .await
    }

    /// `id` is forwarded into the path as-is.
    pub async fn pin_by_id(&self, id: impl Display) -> Result<Reply<Pin>, ApiError> {
        self.executor
            .request(&format!("/pinning/pins/{id}"), RequestOptions::get())
            .await
    }

    /// Returns the raw JSON body. The service answers `202` with an empty
    /// body; unlike the hosted JavaScript client, which fails to parse it,
    /// an empty body decodes as `null` here.
    pub async fn remove_pin(&self, id: impl Display) -> Result<Value, ApiError> {
        self.executor
            .request_json(&format!("/pinning/pins/{id}"), RequestOptions::delete())
            .await
    }
}
