//! JSON-RPC client for the chain collaborator.
//!
//! A thin single-endpoint client over HTTP POST supplying the four
//! operations the profiler needs: transaction, receipt, code, and the
//! struct-logger trace. Implements [`gasline_core::ChainSource`] so the
//! attribution engine can discover bytecode mid-replay.

use async_trait::async_trait;
use gasline_core::ChainSource;
use gasline_core::trace::TraceResult;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

pub mod error;
pub use error::EthClientError;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub id: u64,
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RpcResponse {
    Success(RpcSuccessResponse),
    Error(RpcErrorResponse),
}

#[derive(Debug, Deserialize)]
struct RpcSuccessResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorResponse {
    error: RpcErrorMetadata,
}

#[derive(Debug, Deserialize)]
struct RpcErrorMetadata {
    message: String,
}

/// Transaction fields the profiler consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Absent for contract-creation transactions.
    pub to: Option<String>,
}

/// Receipt fields the profiler consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    /// Hex quantity.
    pub gas_used: String,
    /// Address of the created contract, for creation transactions.
    pub contract_address: Option<String>,
}

impl RpcReceipt {
    /// Parses the receipt's `gasUsed` hex quantity.
    pub fn gas_used(&self) -> Option<i64> {
        i64::from_str_radix(self.gas_used.trim_start_matches("0x"), 16).ok()
    }
}

/// Single-endpoint JSON-RPC client.
#[derive(Debug, Clone)]
pub struct EthClient {
    client: Client,
    url: Url,
}

impl EthClient {
    pub fn new(endpoint: &str) -> Result<Self, EthClientError> {
        let url =
            Url::parse(endpoint).map_err(|e| EthClientError::ParseUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            url,
        })
    }

    async fn send_request(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<Value, EthClientError> {
        let request = RpcRequest {
            id: REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            jsonrpc: "2.0",
            method,
            params,
        };
        trace!(endpoint = %self.url, ?request, "sending rpc request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .json::<RpcResponse>()
            .await?;

        match response {
            RpcResponse::Success(success) => Ok(success.result),
            RpcResponse::Error(failure) => Err(EthClientError::Rpc {
                method,
                message: failure.error.message,
            }),
        }
    }

    /// `eth_getTransactionByHash`.
    pub async fn get_transaction(&self, hash: &str) -> Result<RpcTransaction, EthClientError> {
        let result = self
            .send_request("eth_getTransactionByHash", json!([hash]))
            .await?;
        if result.is_null() {
            return Err(EthClientError::TxNotFound(hash.to_string()));
        }
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_getTransactionReceipt`.
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<RpcReceipt, EthClientError> {
        let result = self
            .send_request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if result.is_null() {
            return Err(EthClientError::ReceiptNotFound(hash.to_string()));
        }
        Ok(serde_json::from_value(result)?)
    }

    /// `eth_getCode` at the latest block.
    pub async fn get_code(&self, address: &str) -> Result<String, EthClientError> {
        let address = format!("0x{}", gasline_core::normalize_address(address));
        let result = self
            .send_request("eth_getCode", json!([address, "latest"]))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// `debug_traceTransaction` with the stack enabled and memory and
    /// storage capture disabled.
    pub async fn trace_transaction(&self, hash: &str) -> Result<TraceResult, EthClientError> {
        let options = json!({
            "disableStack": false,
            "disableMemory": true,
            "disableStorage": true,
        });
        let result = self
            .send_request("debug_traceTransaction", json!([hash, options]))
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl ChainSource for EthClient {
    async fn code_at(&self, address: &str) -> gasline_core::Result<String> {
        self.get_code(address)
            .await
            .map_err(|e| gasline_core::Error::Rpc(e.to_string()))
    }
}
