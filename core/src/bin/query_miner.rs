//! Query one storage provider's ask and print it as JSON.
//!
//! Usage: `estuary-query-miner [MINER]` with `ESTUARY_API_KEY` set.

use std::process::ExitCode;

use estuary_core::{Estuary, RequestOptions};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_MINER: &str = "f0135078";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let miner = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_MINER.to_string());

    let client = match Estuary::from_env() {
        Ok(client) => client,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Raw JSON, so a failed ask (5xx with an error body) is printed too.
    let path = format!("/public/miners/storage/query/{miner}");
    match client.executor().request_json(&path, RequestOptions::get()).await {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("cannot render response: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
