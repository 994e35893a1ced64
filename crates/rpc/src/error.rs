//! RPC client error types

use thiserror::Error;

/// Errors raised by [`EthClient`](crate::EthClient). All of them are fatal
/// for a profile run.
#[derive(Debug, Error)]
pub enum EthClientError {
    /// The configured endpoint is not a valid URL.
    #[error("failed to parse rpc endpoint: {0}")]
    ParseUrl(String),

    /// HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error from {method}: {message}")]
    Rpc {
        /// The JSON-RPC method that failed.
        method: &'static str,
        /// The node's error message.
        message: String,
    },

    /// The result payload did not match the expected shape.
    #[error("unexpected rpc payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The node does not know the transaction.
    #[error("transaction {0} not found")]
    TxNotFound(String),

    /// The node has no receipt for the transaction.
    #[error("receipt for {0} not found")]
    ReceiptNotFound(String),
}
