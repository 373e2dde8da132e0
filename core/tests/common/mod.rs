//! In-process transport that records requests and replays canned responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use estuary_core::{ApiError, ClientConfig, Estuary, HttpRequest, HttpResponse, Transport};

pub const KEY: &str = "EST-test-key-ARY";
pub const BASE_URL: &str = "http://estuary.test";

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<HttpRequest>>,
    replies: Mutex<VecDeque<(u16, String)>>,
}

impl RecordingTransport {
    /// Queue a reply; once the queue is empty every request gets `200 {}`.
    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.sent().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.lock().unwrap().push(request);
        let (status, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| (200, "{}".to_string()));
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

pub fn client() -> (Estuary, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let config = ClientConfig::new(KEY).with_base_url(BASE_URL);
    let client = Estuary::with_transport(config, transport.clone());
    (client, transport)
}
