//! HTTP JSON-RPC transport
//!
//! Speaks JSON-RPC 2.0 to a wallet/node endpoint. Wallet-popup methods
//! (`wallet_connect`, `eth_signTypedData_v4`, ...) only work against an
//! endpoint that fronts a wallet session; plain node endpoints serve the
//! `eth_*` subset.

use crate::{classify_provider_error, WalletProvider};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use spendgrant_types::{Result, SpendGrantError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

/// JSON-RPC 2.0 client over HTTP.
pub struct HttpRpcProvider {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcProvider {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpendGrantError::ProviderUnavailable {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl WalletProvider for HttpRpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpendGrantError::rpc(method, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpendGrantError::rpc(method, format!("HTTP {status}")));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| SpendGrantError::rpc(method, format!("malformed response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(classify_provider_error(method, err.code, &err.message));
        }
        parsed
            .result
            .ok_or_else(|| SpendGrantError::rpc(method, "response had neither result nor error"))
    }
}
