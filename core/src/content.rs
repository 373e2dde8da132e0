//! Content upload, lookup and deal endpoints.

use std::path::Path;

use tracing::debug;

use crate::error::ApiError;
use crate::http::FilePart;
use crate::request::{Executor, Reply, RequestOptions};
use crate::types::{
    AddContentResponse, AddFromIpfs, Content, ContentByCid, ContentStat, DealStatus, Pin,
    StatsQuery,
};

/// Form field the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "append";

/// `/content/*` endpoints.
#[derive(Debug, Clone)]
pub struct ContentClient {
    executor: Executor,
}

impl ContentClient {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Upload one file as `multipart/form-data`.
    pub async fn add(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Reply<AddContentResponse>, ApiError> {
        let file = FilePart {
            field: UPLOAD_FIELD.to_string(),
            file_name: file_name.into(),
            mime: None,
            bytes,
        };
        self.executor
            .request("/content/add", RequestOptions::post_multipart(file))
            .await
    }

    /// Read `path` from disk and upload it under its file name.
    pub async fn add_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Reply<AddContentResponse>, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Config(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        debug!(file = %file_name, bytes = bytes.len(), "uploading file");
        self.add(file_name, bytes).await
    }

    /// Register content that already lives on IPFS by its root CID.
    pub async fn add_from_ipfs(&self, input: &AddFromIpfs) -> Result<Reply<Pin>, ApiError> {
        self.executor
            .request("/content/add-ipfs", RequestOptions::post_json(input)?)
            .await
    }

    pub async fn data_by_cid(&self, cid: &str) -> Result<Reply<Vec<ContentByCid>>, ApiError> {
        self.executor
            .request(&format!("/content/by-cid/{cid}"), RequestOptions::get())
            .await
    }

    pub async fn stats(&self, query: StatsQuery) -> Result<Reply<Vec<ContentStat>>, ApiError> {
        self.executor
            .request(
                &format!("/content/stats?{}", query.to_query_string()),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn deals(&self) -> Result<Reply<Vec<Content>>, ApiError> {
        self.executor
            .request("/content/deals", RequestOptions::get())
            .await
    }

    pub async fn deal_status_by_id(&self, id: u64) -> Result<Reply<DealStatus>, ApiError> {
        self.executor
            .request(&format!("/content/status/{id}"), RequestOptions::get())
            .await
    }
}
