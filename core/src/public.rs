//! Public statistics and storage-provider endpoints.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::request::{Executor, Reply, RequestOptions};
use crate::types::{DealsOnChainMetric, MinerDeal, MinerFailure, MinerQuery, PublicStats};

/// `/public/*` endpoints. The credential is still sent.
#[derive(Debug, Clone)]
pub struct PublicClient {
    executor: Executor,
}

impl PublicClient {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn public_stats(&self) -> Result<Reply<PublicStats>, ApiError> {
        self.executor
            .request("/public/stats", RequestOptions::get())
            .await
    }

    pub async fn deals_on_chain(&self) -> Result<Reply<Vec<DealsOnChainMetric>>, ApiError> {
        self.executor
            .request("/public/metrics/deals-on-chain", RequestOptions::get())
            .await
    }

    /// Storage ask of `miner`.
    ///
    /// A failed ask comes back as a 5xx with an `error` body, returned as
    /// `Reply::ServerError`.
    pub async fn query_miner(&self, miner: &str) -> Result<Reply<MinerQuery>, ApiError> {
        self.executor
            .request(
                &format!("/public/miners/storage/query/{miner}"),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn miner_failures(
        &self,
        miner: &str,
    ) -> Result<Reply<HashMap<String, MinerFailure>>, ApiError> {
        self.executor
            .request(&format!("/public/miners/failures/{miner}"), RequestOptions::get())
            .await
    }

    pub async fn miner_deals(
        &self,
        miner: &str,
    ) -> Result<Reply<HashMap<String, MinerDeal>>, ApiError> {
        self.executor
            .request(&format!("/public/miners/deals/{miner}"), RequestOptions::get())
            .await
    }
}
