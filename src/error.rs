use thiserror::Error;

/// Errors surfaced by the client library.
///
/// Read operations swallow `ContractCall` internally and degrade to
/// empty results; write operations propagate every variant.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown network: {name}. Available: {available}")]
    UnknownNetwork { name: String, available: String },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Malformed metadata JSON: {0}")]
    MalformedJson(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Transaction {tx_hash} not confirmed within {timeout_secs}s")]
    TransactionTimeout { tx_hash: String, timeout_secs: u64 },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedJson(err.to_string())
    }
}
