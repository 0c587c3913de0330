use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::Error;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Deployed registry addresses for a network
#[derive(Debug, Clone, Serialize)]
pub struct ContractAddresses {
    pub identity_registry: &'static str,
    pub reputation_registry: &'static str,
    /// Zero address means not deployed on that network
    pub validation_registry: &'static str,
}

impl ContractAddresses {
    pub fn has_validation(&self) -> bool {
        self.validation_registry != ZERO_ADDRESS
    }
}

/// Configuration for a supported network
#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub contracts: ContractAddresses,
}

/// Static registry of all supported networks, keyed by lowercase name
static NETWORKS: LazyLock<HashMap<&'static str, NetworkConfig>> = LazyLock::new(|| {
    let networks = vec![
        NetworkConfig {
            name: "mainnet",
            chain_id: 1,
            rpc_url: "https://eth.drpc.org",
            explorer_url: "https://etherscan.io",
            contracts: ContractAddresses {
                identity_registry: "0x8004A169FB4a3325136EB29fA0ceB6D2e539a432",
                reputation_registry: "0x8004BAa17C55a88189AE136b182e5fdA19dE9b63",
                validation_registry: ZERO_ADDRESS,
            },
        },
        NetworkConfig {
            name: "sepolia",
            chain_id: 11155111,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
            explorer_url: "https://sepolia.etherscan.io",
            contracts: ContractAddresses {
                identity_registry: "0x8004A818BFB912233c491871b3d84c89A494BD9e",
                reputation_registry: "0x8004B663056A597Dffe9eCcC1965A193B7388713",
                validation_registry: ZERO_ADDRESS,
            },
        },
    ];

    networks.into_iter().map(|n| (n.name, n)).collect()
});

/// Look up a network by name (case-insensitive)
pub fn lookup(name: &str) -> Result<&'static NetworkConfig, Error> {
    NETWORKS
        .get(name.to_lowercase().as_str())
        .ok_or_else(|| Error::UnknownNetwork {
            name: name.to_string(),
            available: network_names().join(", "),
        })
}

/// Contract addresses for a network
pub fn contracts_for(name: &str) -> Result<&'static ContractAddresses, Error> {
    Ok(&lookup(name)?.contracts)
}

/// Names of all supported networks, sorted
pub fn network_names() -> Vec<&'static str> {
    let mut names: Vec<_> = NETWORKS.keys().copied().collect();
    names.sort_unstable();
    names
}
