//! In-memory stand-in for the Estuary HTTP API.
//!
//! Pinning and content routes require `Authorization: Bearer <key>`; public
//! routes are open. Every error is a JSON body with an `error` field.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "EST-local-dev-key-ARY";

/// The one miner whose storage ask succeeds.
pub const KNOWN_MINER: &str = "f0135078";

const CREATED_AT: &str = "2022-03-01T12:00:00Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinInfo {
    pub cid: String,
    pub name: String,
    pub origins: Vec<String>,
    pub meta: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinStatus {
    pub requestid: String,
    pub status: String,
    pub created: String,
    pub pin: PinInfo,
    pub delegates: Vec<String>,
    pub info: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: u64,
    pub cid: String,
    pub name: String,
    pub size: u64,
    pub active: bool,
    pub offloaded: bool,
    pub replication: u32,
    pub pinning: bool,
    pub failed: bool,
}

#[derive(Deserialize)]
pub struct AddPin {
    pub name: String,
    pub cid: String,
}

#[derive(Deserialize)]
pub struct AddIpfs {
    pub name: String,
    pub root: String,
}

#[derive(Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    500
}

#[derive(Default)]
pub struct Store {
    pins: HashMap<u64, PinStatus>,
    contents: Vec<ContentRecord>,
    next_pin_id: u64,
    next_content_id: u64,
}

impl Store {
    fn insert_pin(&mut self, name: String, cid: String) -> PinStatus {
        self.next_pin_id += 1;
        let pin = PinStatus {
            requestid: self.next_pin_id.to_string(),
            status: "queued".to_string(),
            created: CREATED_AT.to_string(),
            pin: PinInfo {
                cid,
                name,
                origins: Vec::new(),
                meta: json!({}),
            },
            delegates: Vec::new(),
            info: json!({}),
        };
        self.pins.insert(self.next_pin_id, pin.clone());
        pin
    }

    fn insert_content(&mut self, name: String, cid: String, size: u64) -> ContentRecord {
        self.next_content_id += 1;
        let content = ContentRecord {
            id: self.next_content_id,
            cid,
            name,
            size,
            active: true,
            offloaded: false,
            replication: 6,
            pinning: false,
            failed: false,
        };
        self.contents.push(content.clone());
        content
    }
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

/// JSON error response in the service's `{"error": ...}` shape.
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        store: Arc::new(RwLock::new(Store::default())),
    };

    let private = Router::new()
        .route("/pinning/pins", get(list_pins).post(add_pin))
        .route("/pinning/pins/{id}", get(get_pin).delete(remove_pin))
        .route("/content/add", post(add_content))
        .route("/content/add-ipfs", post(add_ipfs))
        .route("/content/by-cid/{cid}", get(content_by_cid))
        .route("/content/stats", get(content_stats))
        .route("/content/deals", get(content_deals))
        .route("/content/status/{id}", get(content_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let public = Router::new()
        .route("/public/stats", get(public_stats))
        .route("/public/metrics/deals-on-chain", get(deals_on_chain))
        .route("/public/miners/storage/query/{miner}", get(query_miner))
        .route("/public/miners/failures/{miner}", get(miner_failures))
        .route("/public/miners/deals/{miner}", get(miner_deals));

    private.merge(public).with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock estuary listening");
    }
    axum::serve(listener, app(api_key)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == &*state.api_key);

    if !authorized {
        debug!(path = %request.uri().path(), "rejected unauthorized request");
        return ApiFailure::new(StatusCode::UNAUTHORIZED, "invalid or missing api key")
            .into_response();
    }
    next.run(request).await
}

fn parse_id(raw: &str, what: &str) -> Result<u64, ApiFailure> {
    raw.parse()
        .map_err(|_| ApiFailure::new(StatusCode::BAD_REQUEST, format!("invalid {what} id: {raw}")))
}

// --- pinning ---

async fn list_pins(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    let mut results: Vec<&PinStatus> = store.pins.values().collect();
    results.sort_by_key(|pin| pin.requestid.parse::<u64>().unwrap_or_default());
    Json(json!({ "count": results.len(), "results": results }))
}

async fn add_pin(
    State(state): State<AppState>,
    input: Result<Json<AddPin>, JsonRejection>,
) -> Result<(StatusCode, Json<PinStatus>), ApiFailure> {
    let Json(input) = input?;
    if input.cid.is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "cid is required"));
    }
    let pin = state.store.write().await.insert_pin(input.name, input.cid);
    Ok((StatusCode::ACCEPTED, Json(pin)))
}

async fn get_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PinStatus>, ApiFailure> {
    let id = parse_id(&id, "pin")?;
    let store = state.store.read().await;
    store
        .pins
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "pin not found"))
}

async fn remove_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let id = parse_id(&id, "pin")?;
    match state.store.write().await.pins.remove(&id) {
        Some(_) => Ok(StatusCode::ACCEPTED),
        None => Err(ApiFailure::new(StatusCode::NOT_FOUND, "pin not found")),
    }
}

// --- content ---

async fn add_content(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiFailure> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some("append") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, e.body_text()))?;
        let cid = format!("bafkmock{}", Uuid::new_v4().simple());
        let content = state
            .store
            .write()
            .await
            .insert_content(name, cid, data.len() as u64);
        return Ok(Json(json!({
            "cid": content.cid,
            "estuaryId": content.id,
            "providers": ["/ip4/127.0.0.1/tcp/6744/p2p/12D3KooWmock"],
        })));
    }
    Err(ApiFailure::new(
        StatusCode::BAD_REQUEST,
        "missing file field \"append\"",
    ))
}

async fn add_ipfs(
    State(state): State<AppState>,
    input: Result<Json<AddIpfs>, JsonRejection>,
) -> Result<Json<PinStatus>, ApiFailure> {
    let Json(input) = input?;
    if input.root.is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "root is required"));
    }
    let mut store = state.store.write().await;
    store.insert_content(input.name.clone(), input.root.clone(), 0);
    Ok(Json(store.insert_pin(input.name, input.root)))
}

async fn content_by_cid(State(state): State<AppState>, Path(cid): Path<String>) -> Json<Value> {
    let store = state.store.read().await;
    let matches: Vec<Value> = store
        .contents
        .iter()
        .filter(|content| content.cid == cid)
        .map(|content| json!({ "content": content, "selector": "" }))
        .collect();
    Json(Value::Array(matches))
}

async fn content_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Json<Value> {
    let store = state.store.read().await;
    let rows: Vec<Value> = store
        .contents
        .iter()
        .skip(params.offset)
        .take(params.limit)
        .map(|content| {
            json!({
                "id": content.id,
                "cid": { "/": content.cid },
                "file": content.name,
                "bwUsed": 0,
                "totalRequests": 0,
                "offloaded": content.offloaded,
                "aggregatedFiles": 0,
            })
        })
        .collect();
    Json(Value::Array(rows))
}

async fn content_deals(State(state): State<AppState>) -> Json<Vec<ContentRecord>> {
    Json(state.store.read().await.contents.clone())
}

async fn content_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let id = parse_id(&id, "content")?;
    let store = state.store.read().await;
    let content = store
        .contents
        .iter()
        .find(|content| content.id == id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "content not found"))?;
    Ok(Json(json!({
        "content": content,
        "deals": [{
            "deal": mock_deal(KNOWN_MINER, content),
            "transfer": {
                "transferId": "1",
                "status": 6,
                "statusMessage": "Completed",
                "sent": content.size,
                "received": content.size,
            },
            "onChainState": { "sectorStartEpoch": 1_550_000 },
        }],
        "failuresCount": 0,
    })))
}

fn mock_deal(miner: &str, content: &ContentRecord) -> Value {
    json!({
        "id": content.id,
        "CreatedAt": CREATED_AT,
        "UpdatedAt": CREATED_AT,
        "content": content.id,
        "propCid": format!("bafyprop{}", content.id),
        "miner": miner,
        "dealId": 4_000_000 + content.id,
        "failed": false,
        "verified": true,
        "failedAt": "0001-01-01T00:00:00Z",
        "dtChan": "",
        "transferStarted": CREATED_AT,
        "transferFinished": CREATED_AT,
        "onChainAt": CREATED_AT,
        "sealedAt": CREATED_AT,
        "contentCid": content.cid,
    })
}

// --- public ---

async fn public_stats(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    let total_storage: u64 = store.contents.iter().map(|content| content.size).sum();
    Json(json!({
        "totalStorage": total_storage,
        "totalFiles": store.contents.len(),
        "dealsOnChain": store.contents.len(),
    }))
}

async fn deals_on_chain() -> Json<Value> {
    Json(json!([{
        "time": CREATED_AT,
        "dealsOnChain": 12,
        "dealsOnChainBytes": 412_316_860_416u64,
        "dealsAttempted": 20,
        "dealsSealed": 10,
        "dealsSealedBytes": 343_597_383_680u64,
        "dealsFailed": 8,
    }]))
}

async fn query_miner(Path(miner): Path<String>) -> Response {
    if miner != KNOWN_MINER {
        return ApiFailure::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to query miner {miner}"),
        )
        .into_response();
    }
    Json(json!({
        "miner": miner,
        "price": "0",
        "verifiedPrice": "0",
        "minPieceSize": 256,
        "maxPieceSize": 34_359_738_368u64,
    }))
    .into_response()
}

async fn miner_failures(Path(miner): Path<String>) -> Json<Value> {
    Json(json!({
        "0": {
            "ID": 1,
            "CreatedAt": CREATED_AT,
            "UpdatedAt": CREATED_AT,
            "DeletedAt": null,
            "miner": miner,
            "phase": "send-proposal",
            "message": "deal rejected: price too low",
            "content": 1,
            "minerVersion": "1.15.1",
        }
    }))
}

async fn miner_deals(State(state): State<AppState>, Path(miner): Path<String>) -> Json<Value> {
    let store = state.store.read().await;
    let deals: serde_json::Map<String, Value> = store
        .contents
        .iter()
        .enumerate()
        .map(|(index, content)| (index.to_string(), mock_deal(&miner, content)))
        .collect();
    Json(Value::Object(deals))
}
