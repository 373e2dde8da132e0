//! DTOs for the Estuary API.
//!
//! # Design
//! The server owns these records; the client only declares their shape. Every
//! field is defaulted so an older or newer server that omits a field still
//! decodes, and records that the API is known to extend carry a flattened
//! `extra` map so unknown fields survive a round-trip. Fields the API leaves
//! untyped stay `serde_json::Value`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Pinning
// ---------------------------------------------------------------------------

/// Request payload for `POST /pinning/pins`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddPin {
    pub name: String,
    pub cid: String,
}

/// The pinned object inside a `Pin`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PinInfo {
    pub cid: String,
    pub name: String,
    pub origins: Vec<String>,
    pub meta: Value,
}

/// Pin status as returned by the pinning endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pin {
    pub requestid: String,
    /// `queued`, `pinning`, `pinned` or `failed`.
    pub status: String,
    pub created: String,
    pub pin: PinInfo,
    pub delegates: Vec<String>,
    pub info: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PinList {
    pub count: u64,
    pub results: Vec<Pin>,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Request payload for `POST /content/add-ipfs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddFromIpfs {
    pub name: String,
    pub root: String,
}

/// Response of a multipart upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AddContentResponse {
    pub cid: String,
    pub estuary_id: u64,
    pub providers: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Content {
    pub id: u64,
    pub cid: String,
    pub name: String,
    pub size: u64,
    pub active: bool,
    pub offloaded: bool,
    pub replication: u32,
    pub pinning: bool,
    pub failed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One match of `GET /content/by-cid/{cid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentByCid {
    pub content: Content,
    pub aggregated_in: Option<Content>,
    pub selector: Option<String>,
}

/// One row of `GET /content/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentStat {
    pub id: u64,
    pub cid: HashMap<String, String>,
    pub file: String,
    pub bw_used: u64,
    pub total_requests: u64,
    pub offloaded: bool,
    pub aggregated_files: u64,
}

/// Paging for `GET /content/stats`; unset fields fall back to 0 and 500.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl StatsQuery {
    pub const DEFAULT_OFFSET: u64 = 0;
    pub const DEFAULT_LIMIT: u64 = 500;

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_query_string(self) -> String {
        format!(
            "offset={}&limit={}",
            self.offset.unwrap_or(Self::DEFAULT_OFFSET),
            self.limit.unwrap_or(Self::DEFAULT_LIMIT)
        )
    }
}

// ---------------------------------------------------------------------------
// Deals
// ---------------------------------------------------------------------------

/// A storage deal. Also the value type of `GET /public/miners/deals/{miner}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Deal {
    pub id: u64,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    pub content: u64,
    pub prop_cid: String,
    pub miner: String,
    pub deal_id: u64,
    pub failed: bool,
    pub verified: bool,
    pub failed_at: String,
    pub dt_chan: String,
    pub transfer_started: String,
    pub transfer_finished: String,
    pub on_chain_at: String,
    pub sealed_at: String,
    pub content_cid: String,
}

pub type MinerDeal = Deal;

/// Data-transfer channel state for a deal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Transfer {
    pub transfer_id: String,
    pub channel_id: Value,
    pub status: u64,
    pub status_message: String,
    pub message: String,
    pub sent: u64,
    pub received: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DealWithTransfer {
    pub deal: Deal,
    pub transfer: Transfer,
    /// Left untyped by the API.
    pub on_chain_state: Value,
}

/// Response of `GET /content/status/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DealStatus {
    pub content: Content,
    pub deals: Vec<DealWithTransfer>,
    pub failures_count: u64,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicStats {
    pub total_storage: u64,
    pub total_files: u64,
    pub deals_on_chain: u64,
}

/// One sample of `GET /public/metrics/deals-on-chain`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct DealsOnChainMetric {
    pub time: String,
    pub deals_on_chain: u64,
    pub deals_on_chain_bytes: u64,
    pub deals_attempted: u64,
    pub deals_sealed: u64,
    pub deals_sealed_bytes: u64,
    pub deals_failed: u64,
}

/// Storage ask of a miner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MinerQuery {
    pub miner: String,
    pub price: String,
    pub verified_price: String,
    pub min_piece_size: u64,
    pub max_piece_size: u64,
}

/// A recorded deal-making failure for a miner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MinerFailure {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Value,
    pub miner: String,
    pub phase: String,
    pub message: String,
    pub content: u64,
    pub miner_version: String,
}
