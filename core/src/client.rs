//! The `Estuary` aggregate.
//!
//! # Design
//! The three endpoint groups are independent values. `Estuary` builds one
//! `Executor` and hands a clone to each group, so all of them share the same
//! credential and transport without any type hierarchy.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::content::ContentClient;
use crate::error::ApiError;
use crate::pins::PinningClient;
use crate::public::PublicClient;
use crate::request::Executor;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct Estuary {
    pub pins: PinningClient,
    pub content: ContentClient,
    pub public: PublicClient,
    executor: Executor,
}

impl Estuary {
    /// Client for the public Estuary host.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Client configured from `ESTUARY_API_KEY` / `ESTUARY_API_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::from_executor(Executor::with_reqwest(config)?))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_executor(Executor::new(config, transport))
    }

    fn from_executor(executor: Executor) -> Self {
        Self {
            pins: PinningClient::new(executor.clone()),
            content: ContentClient::new(executor.clone()),
            public: PublicClient::new(executor.clone()),
            executor,
        }
    }

    /// The shared executor, for endpoints without a typed wrapper.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}
