//! Async client for the Estuary pinning and storage API.
//!
//! # Overview
//! Every method maps onto exactly one HTTP request. Requests are built and
//! responses parsed as plain data (`HttpRequest` / `HttpResponse`); a
//! `Transport` performs the round-trip in between, `reqwest` by default.
//!
//! # Design
//! - `Executor` injects the JSON content type and bearer credential, sends
//!   one request, decodes JSON and rejects 4xx statuses.
//! - `PinningClient`, `ContentClient` and `PublicClient` hard-code the URL
//!   templates; `Estuary` composes one of each over a shared executor.
//! - 5xx responses are returned as parsed JSON, not as errors; typed methods
//!   return them as `Reply::ServerError`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), estuary_core::ApiError> {
//! let client = estuary_core::Estuary::new("EST...ARY")?;
//! match client.public.query_miner("f0135078").await? {
//!     estuary_core::Reply::Ok(ask) => println!("{} asks {}", ask.miner, ask.price),
//!     estuary_core::Reply::ServerError { status, body } => eprintln!("{status}: {body}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod pins;
pub mod public;
pub mod request;
pub mod transport;
pub mod types;

pub use client::Estuary;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use content::ContentClient;
pub use error::ApiError;
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use pins::PinningClient;
pub use public::PublicClient;
pub use request::{Executor, Reply, RequestOptions};
pub use transport::{ReqwestTransport, Transport};
pub use types::*;
