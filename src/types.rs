//! Result payloads returned by the client.
//!
//! These are plain value objects, rebuilt for every call and serializable
//! so callers can emit them as JSON directly.

use serde::Serialize;
use serde_json::Value;

use crate::codec;
use crate::error::Error;
use crate::networks::ContractAddresses;

/// An on-chain agent record.
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub agent_id: u64,
    pub token_uri: Option<String>,
    pub owner: String,
    /// Decoded registration metadata, when the URI was resolvable
    pub metadata: Option<Value>,
    pub explorer_url: String,
}

/// Aggregate reputation for an agent over an explicit reviewer set.
#[derive(Debug, Clone, Serialize)]
pub struct ReputationSummary {
    pub agent_id: u64,
    pub feedback_count: u64,
    pub average_score: Option<f64>,
    pub decimals: u8,
    pub raw_value: i128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub filters: ReputationFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReputationFilters {
    pub client_addresses: Vec<String>,
    pub tag1: String,
    pub tag2: String,
}

impl ReputationSummary {
    /// Zero-valued summary used when the query cannot produce data.
    pub(crate) fn empty(agent_id: u64, filters: ReputationFilters) -> Self {
        Self {
            agent_id,
            feedback_count: 0,
            average_score: None,
            decimals: 0,
            raw_value: 0,
            note: None,
            error: None,
            filters,
        }
    }
}

/// Network configuration as seen by the connected client.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkInfo {
    pub network: &'static str,
    pub chain_id: u64,
    pub rpc_url: String,
    pub contracts: ContractAddresses,
    pub explorer: &'static str,
}

/// Result of a registration transaction.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResult {
    /// Recovered from the mint event; absent when no matching log was found
    pub agent_id: Option<u64>,
    pub tx_hash: String,
    pub owner: String,
    pub explorer_url: String,
}

/// Result of a URI update transaction.
#[derive(Debug, Clone, Serialize)]
pub struct UriUpdateResult {
    pub agent_id: u64,
    pub new_uri: String,
    pub tx_hash: String,
    pub explorer_url: String,
}

/// Result of a feedback submission.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResult {
    pub agent_id: u64,
    pub value: f64,
    pub decimals: u8,
    pub tag1: String,
    pub tag2: String,
    pub tx_hash: String,
    pub explorer_url: String,
}

/// URI argument for registration and URI updates: either a literal URI
/// string or a metadata object to inline as a data URI.
#[derive(Debug, Clone)]
pub enum AgentUri {
    Uri(String),
    Metadata(Value),
}

impl AgentUri {
    pub(crate) fn into_uri(self) -> Result<String, Error> {
        match self {
            AgentUri::Uri(uri) => Ok(uri),
            AgentUri::Metadata(metadata) => codec::encode_data_uri(&metadata),
        }
    }
}

impl From<&str> for AgentUri {
    fn from(uri: &str) -> Self {
        AgentUri::Uri(uri.to_string())
    }
}

impl From<String> for AgentUri {
    fn from(uri: String) -> Self {
        AgentUri::Uri(uri)
    }
}

impl From<Value> for AgentUri {
    fn from(metadata: Value) -> Self {
        AgentUri::Metadata(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_uri_passthrough() {
        let uri = AgentUri::from("ipfs://bafy123");
        assert_eq!(uri.into_uri().unwrap(), "ipfs://bafy123");
    }

    #[test]
    fn test_agent_uri_encodes_metadata() {
        let uri = AgentUri::from(json!({"name": "Test Agent"}))
            .into_uri()
            .unwrap();
        assert!(uri.starts_with(codec::DATA_URI_PREFIX));
        let decoded = codec::decode_data_uri(&uri).unwrap();
        assert_eq!(decoded["name"], "Test Agent");
    }

    #[test]
    fn test_reputation_summary_serializes_without_empty_note() {
        let summary = ReputationSummary::empty(
            7,
            ReputationFilters {
                client_addresses: vec![],
                tag1: String::new(),
                tag2: String::new(),
            },
        );
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["agent_id"], 7);
        assert_eq!(value["feedback_count"], 0);
        assert!(value.get("note").is_none());
        assert!(value.get("error").is_none());
    }
}
