//! Chain Gateway Module
//!
//! Per-network JSON-RPC access: bytecode fetch, storage-slot reads, balance
//! and nonce lookups, and raw `eth_call`. One gateway per audit invocation;
//! no connection pooling across networks.
//!
//! Every call is a single blocking request with a fixed timeout. Failures
//! are absorbed or surfaced by the caller per field/stage - the gateway
//! itself never retries.

use alloy_primitives::{Address, U256};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult, ErrorCode};

/// User-Agent for RPC provider dashboards
const USER_AGENT_STRING: &str = "ContractSentry/0.1.0";

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

/// JSON-RPC error body
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC client for one network
#[derive(Debug, Clone)]
pub struct ChainGateway {
    url: String,
    client: reqwest::Client,
    network: String,
}

impl ChainGateway {
    /// Build a gateway for one network endpoint
    pub fn new(url: &str, network: &str, timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::RpcConnectionFailed, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            url: url.to_string(),
            client,
            network: network.to_string(),
        })
    }

    /// Network name this gateway is bound to
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Execute a single JSON-RPC call. No retries.
    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> AppResult<T> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        debug!("RPC {} -> {}", method, self.network);

        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::rpc_error(format!("HTTP error: {}", status)));
        }

        let json: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "Malformed RPC response", e))?;

        if let Some(error) = json.error {
            return Err(AppError::rpc_error(format!(
                "RPC error: {} (code: {})",
                error.message, error.code
            )));
        }

        json.result
            .ok_or_else(|| AppError::new(ErrorCode::RpcInvalidResponse, "No result in response"))
    }

    /// Liveness check against the endpoint
    pub async fn is_connected(&self) -> bool {
        self.call::<String>("eth_blockNumber", serde_json::json!([]))
            .await
            .is_ok()
    }

    /// Deployed bytecode as a 0x-prefixed hex string
    pub async fn get_code(&self, address: &Address) -> AppResult<String> {
        let params = serde_json::json!([format!("{address:#x}"), "latest"]);
        self.call::<String>("eth_getCode", params).await
    }

    /// 32-byte storage word at the given slot
    pub async fn get_storage_at(&self, address: &Address, slot: U256) -> AppResult<U256> {
        let params = serde_json::json!([
            format!("{address:#x}"),
            format!("0x{slot:x}"),
            "latest"
        ]);
        let word: String = self.call("eth_getStorageAt", params).await?;
        parse_hex_u256(&word)
    }

    /// Native balance in wei
    pub async fn get_balance(&self, address: &Address) -> AppResult<U256> {
        let params = serde_json::json!([format!("{address:#x}"), "latest"]);
        let balance: String = self.call("eth_getBalance", params).await?;
        parse_hex_u256(&balance)
    }

    /// Account nonce
    pub async fn get_transaction_count(&self, address: &Address) -> AppResult<u64> {
        let params = serde_json::json!([format!("{address:#x}"), "latest"]);
        let nonce: String = self.call("eth_getTransactionCount", params).await?;
        u64::from_str_radix(nonce.trim_start_matches("0x"), 16)
            .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "Malformed nonce", e))
    }

    /// Raw `eth_call` with pre-encoded calldata; returns the raw return bytes
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> AppResult<Vec<u8>> {
        let params = serde_json::json!([
            {
                "to": format!("{to:#x}"),
                "data": format!("0x{}", hex::encode(data))
            },
            "latest"
        ]);
        let output: String = self.call("eth_call", params).await?;
        hex::decode(output.trim_start_matches("0x")).map_err(|e| {
            AppError::with_source(ErrorCode::RpcInvalidResponse, "Malformed call output", e)
        })
    }
}

/// Parse a 0x-prefixed hex quantity into a U256
fn parse_hex_u256(s: &str) -> AppResult<U256> {
    let digits = s.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| AppError::with_source(ErrorCode::RpcInvalidResponse, "Malformed hex quantity", e))
}
