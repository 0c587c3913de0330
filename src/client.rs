use std::time::Duration;

use alloy::{
    eips::eip2718::Encodable2718,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{Log, TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
    transports::http::{Client, Http},
};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::abi::{
    IIdentityRegistry::{self, IIdentityRegistryInstance},
    IReputationRegistry::{self, IReputationRegistryInstance},
    TRANSFER_EVENT_SIGNATURE,
};
use crate::codec;
use crate::error::Error;
use crate::networks::{self, NetworkConfig};
use crate::types::{
    Agent, AgentUri, FeedbackResult, NetworkInfo, RegistrationResult, ReputationFilters,
    ReputationSummary, UriUpdateResult,
};
use crate::wallet;

type HttpProvider = RootProvider<Http<Client>, Ethereum>;

/// Registration also mints the agent token, so it gets more headroom
/// than URI updates or feedback.
const REGISTER_GAS_LIMIT: u128 = 500_000;
const DEFAULT_GAS_LIMIT: u128 = 300_000;

const DEFAULT_TX_TIMEOUT: Duration = Duration::from_secs(120);
const METADATA_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Client for the ERC-8004 identity and reputation registries.
///
/// Read operations need no key and degrade to empty results on failure.
/// Write operations take a private key per call, build and sign the
/// transaction locally, and propagate every failure.
pub struct Erc8004Client {
    network: &'static NetworkConfig,
    rpc_url: Url,
    identity_address: Address,
    reputation_address: Address,
    http: reqwest::Client,
    tx_timeout: Duration,
}

impl Erc8004Client {
    /// Connect to a named network, optionally overriding its RPC URL.
    ///
    /// The network name is matched case-insensitively against the
    /// configured networks.
    pub fn new(network: &str, rpc_url: Option<&str>) -> Result<Self, Error> {
        let config = networks::lookup(network)?;

        let rpc = rpc_url.unwrap_or(config.rpc_url);
        let rpc_url = Url::parse(rpc).map_err(|e| Error::InvalidRpcUrl(format!("{}: {}", rpc, e)))?;

        let identity_address = config
            .contracts
            .identity_registry
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("identity registry: {}", e)))?;
        let reputation_address = config
            .contracts
            .reputation_registry
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("reputation registry: {}", e)))?;

        Ok(Self {
            network: config,
            rpc_url,
            identity_address,
            reputation_address,
            http: reqwest::Client::new(),
            tx_timeout: DEFAULT_TX_TIMEOUT,
        })
    }

    /// Bound the confirmation wait for write operations.
    pub fn with_tx_timeout(mut self, timeout: Duration) -> Self {
        self.tx_timeout = timeout;
        self
    }

    fn provider(&self) -> HttpProvider {
        ProviderBuilder::new().on_http(self.rpc_url.clone())
    }

    // ==================== READ METHODS ====================

    /// Check if an agent exists.
    ///
    /// Existence is inferred from the owner lookup succeeding; any call
    /// failure, transient or not, reads as absent.
    pub async fn agent_exists(&self, agent_id: u64) -> bool {
        let contract = IIdentityRegistryInstance::new(self.identity_address, self.provider());

        match contract.ownerOf(U256::from(agent_id)).call().await {
            Ok(_) => true,
            Err(e) => {
                debug!("ownerOf({}) failed, treating as absent: {}", agent_id, e);
                false
            }
        }
    }

    /// Get agent details by id, or `None` when the owner lookup fails.
    ///
    /// The token URI and metadata are resolved best-effort: an empty or
    /// unreadable URI, or an unreachable metadata document, leaves the
    /// corresponding field absent without failing the call.
    pub async fn get_agent(&self, agent_id: u64) -> Option<Agent> {
        let contract = IIdentityRegistryInstance::new(self.identity_address, self.provider());

        let owner = match contract.ownerOf(U256::from(agent_id)).call().await {
            Ok(result) => result._0,
            Err(e) => {
                debug!("Agent {} owner lookup failed: {}", agent_id, e);
                return None;
            }
        };

        let token_uri = match contract.tokenURI(U256::from(agent_id)).call().await {
            Ok(result) if !result._0.is_empty() => Some(result._0),
            Ok(_) => None,
            Err(e) => {
                debug!("Agent {} tokenURI lookup failed: {}", agent_id, e);
                None
            }
        };

        let metadata = match &token_uri {
            Some(uri) => self.fetch_metadata(uri).await,
            None => None,
        };

        Some(Agent {
            agent_id,
            token_uri,
            owner: owner.to_string(),
            metadata,
            explorer_url: format!(
                "{}/nft/{}/{}",
                self.network.explorer_url, self.network.contracts.identity_registry, agent_id
            ),
        })
    }

    /// Number of agents owned by an address.
    pub async fn get_agent_count(&self, owner_address: &str) -> Result<u64, Error> {
        let address: Address = owner_address
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", owner_address, e)))?;

        let contract = IIdentityRegistryInstance::new(self.identity_address, self.provider());
        let count = contract
            .balanceOf(address)
            .call()
            .await
            .map_err(|e| Error::ContractCall(format!("balanceOf failed: {}", e)))?;

        Ok(u64::try_from(count._0).unwrap_or(u64::MAX))
    }

    /// Reputation summary for an agent over an explicit reviewer set.
    ///
    /// The summary call requires reviewer addresses; without them this
    /// returns a zero-valued summary carrying a note. Query failures
    /// likewise come back as a zero-valued summary carrying the error
    /// text, never as `Err`.
    pub async fn get_reputation(
        &self,
        agent_id: u64,
        client_addresses: &[String],
        tag1: &str,
        tag2: &str,
    ) -> ReputationSummary {
        let filters = ReputationFilters {
            client_addresses: client_addresses.to_vec(),
            tag1: tag1.to_string(),
            tag2: tag2.to_string(),
        };

        if client_addresses.is_empty() {
            let mut summary = ReputationSummary::empty(agent_id, filters);
            summary.note = Some(
                "Provide client_addresses to query reputation from specific reviewers".to_string(),
            );
            return summary;
        }

        match self.query_summary(agent_id, client_addresses, tag1, tag2).await {
            Ok((count, raw_value, decimals)) => ReputationSummary {
                agent_id,
                feedback_count: count,
                average_score: Some(raw_value as f64 / 10f64.powi(decimals as i32)),
                decimals,
                raw_value,
                note: None,
                error: None,
                filters,
            },
            Err(e) => {
                debug!("Reputation query for agent {} failed: {}", agent_id, e);
                let mut summary = ReputationSummary::empty(agent_id, filters);
                summary.error = Some(e.to_string());
                summary
            }
        }
    }

    async fn query_summary(
        &self,
        agent_id: u64,
        addresses: &[String],
        tag1: &str,
        tag2: &str,
    ) -> Result<(u64, i128, u8), Error> {
        let mut reviewers = Vec::with_capacity(addresses.len());
        for address in addresses {
            reviewers.push(
                address
                    .parse::<Address>()
                    .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?,
            );
        }

        let contract = IReputationRegistryInstance::new(self.reputation_address, self.provider());
        let summary = contract
            .getSummary(
                U256::from(agent_id),
                reviewers,
                tag1.to_string(),
                tag2.to_string(),
            )
            .call()
            .await
            .map_err(|e| Error::ContractCall(format!("getSummary failed: {}", e)))?;

        Ok((summary.count, summary.summaryValue, summary.summaryValueDecimals))
    }

    /// Configuration of the connected network.
    pub fn network_info(&self) -> NetworkInfo {
        NetworkInfo {
            network: self.network.name,
            chain_id: self.network.chain_id,
            rpc_url: self.rpc_url.to_string(),
            contracts: self.network.contracts.clone(),
            explorer: self.network.explorer_url,
        }
    }

    /// Resolve an agent's metadata document, best-effort.
    ///
    /// Data URIs decode locally; http(s) and ipfs URIs are fetched with
    /// a short timeout. Any failure yields `None`.
    async fn fetch_metadata(&self, token_uri: &str) -> Option<Value> {
        if token_uri.starts_with(codec::DATA_URI_PREFIX) {
            return match codec::decode_data_uri(token_uri) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    debug!("Inline metadata decode failed: {}", e);
                    None
                }
            };
        }

        if !token_uri.starts_with("http") && !token_uri.starts_with("ipfs://") {
            return None;
        }

        let url = match token_uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}{}", IPFS_GATEWAY, cid),
            None => token_uri.to_string(),
        };

        let response = match self
            .http
            .get(&url)
            .timeout(METADATA_FETCH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Metadata fetch from {} failed: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("Metadata fetch from {} returned {}", url, response.status());
            return None;
        }

        match response.json().await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!("Metadata from {} is not valid JSON: {}", url, e);
                None
            }
        }
    }

    // ==================== WRITE METHODS ====================

    /// Register a new agent.
    ///
    /// With a URI (or a metadata object, inlined as a data URI) the
    /// URI-taking register call is used; otherwise the bare one. The new
    /// agent id is recovered from the mint event in the receipt and may
    /// be absent when no matching log was emitted.
    pub async fn register(
        &self,
        private_key: &str,
        agent_uri: Option<AgentUri>,
    ) -> Result<RegistrationResult, Error> {
        let signer = wallet::derive_signer(private_key)?;
        let owner = signer.address();

        let uri = match agent_uri {
            Some(uri) => uri.into_uri()?,
            None => String::new(),
        };

        let calldata = if uri.is_empty() {
            info!("Registering new agent (no URI)");
            IIdentityRegistry::register_2Call {}.abi_encode()
        } else {
            info!("Registering new agent ({} byte URI)", uri.len());
            IIdentityRegistry::register_1Call { agentURI: uri }.abi_encode()
        };

        let (tx_hash, receipt) = self
            .send_transaction(signer, self.identity_address, calldata, REGISTER_GAS_LIMIT)
            .await?;

        let agent_id = agent_id_from_logs(receipt.inner.logs());
        match agent_id {
            Some(id) => info!("Agent {} registered (tx: {})", id, tx_hash),
            None => warn!("No transfer event in receipt for {}", tx_hash),
        }

        Ok(RegistrationResult {
            agent_id,
            tx_hash: tx_hash.clone(),
            owner: owner.to_string(),
            explorer_url: format!("{}/tx/{}", self.network.explorer_url, tx_hash),
        })
    }

    /// Register a new agent with structured metadata.
    pub async fn register_agent(
        &self,
        private_key: &str,
        name: &str,
        description: &str,
        image: &str,
        services: Vec<Value>,
        supported_trust: Option<Vec<String>>,
    ) -> Result<RegistrationResult, Error> {
        let metadata =
            codec::registration_metadata(name, description, image, services, supported_trust);
        self.register(private_key, Some(AgentUri::Metadata(metadata))).await
    }

    /// Replace an agent's URI.
    pub async fn set_agent_uri(
        &self,
        private_key: &str,
        agent_id: u64,
        new_uri: AgentUri,
    ) -> Result<UriUpdateResult, Error> {
        let signer = wallet::derive_signer(private_key)?;
        let uri = new_uri.into_uri()?;

        info!("Updating URI for agent {}", agent_id);
        let calldata = IIdentityRegistry::setAgentURICall {
            agentId: U256::from(agent_id),
            newURI: uri.clone(),
        }
        .abi_encode();

        let (tx_hash, _) = self
            .send_transaction(signer, self.identity_address, calldata, DEFAULT_GAS_LIMIT)
            .await?;

        Ok(UriUpdateResult {
            agent_id,
            new_uri: uri,
            tx_hash: tx_hash.clone(),
            explorer_url: format!("{}/tx/{}", self.network.explorer_url, tx_hash),
        })
    }

    /// Submit feedback for an agent.
    ///
    /// `value` is converted to a fixed-point integer at the given number
    /// of decimals before encoding. An absent `feedback_hash` is encoded
    /// as 32 zero bytes.
    #[allow(clippy::too_many_arguments)]
    pub async fn give_feedback(
        &self,
        private_key: &str,
        agent_id: u64,
        value: f64,
        decimals: u8,
        tag1: &str,
        tag2: &str,
        endpoint: &str,
        feedback_uri: &str,
        feedback_hash: Option<B256>,
    ) -> Result<FeedbackResult, Error> {
        let signer = wallet::derive_signer(private_key)?;
        let int_value = encode_fixed_point(value, decimals);

        info!(
            "Submitting feedback for agent {} (value {} at {} decimals)",
            agent_id, value, decimals
        );
        let calldata = IReputationRegistry::giveFeedbackCall {
            agentId: U256::from(agent_id),
            value: int_value,
            valueDecimals: decimals,
            tag1: tag1.to_string(),
            tag2: tag2.to_string(),
            endpoint: endpoint.to_string(),
            feedbackURI: feedback_uri.to_string(),
            feedbackHash: feedback_hash.unwrap_or(B256::ZERO),
        }
        .abi_encode();

        let (tx_hash, _) = self
            .send_transaction(signer, self.reputation_address, calldata, DEFAULT_GAS_LIMIT)
            .await?;

        Ok(FeedbackResult {
            agent_id,
            value,
            decimals,
            tag1: tag1.to_string(),
            tag2: tag2.to_string(),
            tx_hash: tx_hash.clone(),
            explorer_url: format!("{}/tx/{}", self.network.explorer_url, tx_hash),
        })
    }

    /// Build, sign and submit a transaction, then wait for its receipt.
    ///
    /// The envelope is populated by hand: the nonce is re-fetched per
    /// transaction and the gas limit is a fixed per-operation value, so
    /// no filler state leaks between calls. The receipt wait is bounded
    /// by the configured timeout.
    async fn send_transaction(
        &self,
        signer: PrivateKeySigner,
        to: Address,
        calldata: Vec<u8>,
        gas_limit: u128,
    ) -> Result<(String, TransactionReceipt), Error> {
        let provider = self.provider();
        let from = signer.address();

        let nonce = provider
            .get_transaction_count(from)
            .await
            .map_err(|e| Error::ContractCall(format!("Failed to fetch nonce: {}", e)))?;
        let gas_price = provider
            .get_gas_price()
            .await
            .map_err(|e| Error::ContractCall(format!("Failed to fetch gas price: {}", e)))?;

        debug!(
            "Sending transaction to {} (nonce: {}, gas limit: {}, gas price: {})",
            to, nonce, gas_limit, gas_price
        );

        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(calldata)
            .with_nonce(nonce)
            .with_chain_id(self.network.chain_id)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price);

        let wallet = EthereumWallet::from(signer);
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| Error::ContractCall(format!("Failed to sign transaction: {}", e)))?;

        let pending = provider
            .send_raw_transaction(&envelope.encoded_2718())
            .await
            .map_err(|e| Error::ContractCall(format!("Failed to submit transaction: {}", e)))?;

        let tx_hash = format!("0x{}", hex::encode(pending.tx_hash().as_slice()));
        info!("Transaction sent: {}", tx_hash);

        let receipt = match tokio::time::timeout(self.tx_timeout, pending.get_receipt()).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                return Err(Error::ContractCall(format!(
                    "Failed to get receipt for {}: {}",
                    tx_hash, e
                )))
            }
            Err(_) => {
                return Err(Error::TransactionTimeout {
                    tx_hash,
                    timeout_secs: self.tx_timeout.as_secs(),
                })
            }
        };

        if !receipt.status() {
            return Err(Error::ContractCall(format!("Transaction {} reverted", tx_hash)));
        }

        debug!(
            "Transaction {} mined in block {}",
            tx_hash,
            receipt.block_number.unwrap_or_default()
        );

        Ok((tx_hash, receipt))
    }
}

/// Fixed-point encoding used by the feedback call: value * 10^decimals,
/// rounded to the nearest integer.
fn encode_fixed_point(value: f64, decimals: u8) -> i128 {
    (value * 10f64.powi(decimals as i32)).round() as i128
}

/// Recover the minted agent id from receipt logs.
///
/// Matches the ERC-721 transfer signature with all three indexed fields
/// present; the token id topic is the agent id. The last matching log
/// wins, and a token id wider than u64 reads as absent.
fn agent_id_from_logs(logs: &[Log]) -> Option<u64> {
    let mut agent_id = None;
    for log in logs {
        let topics = log.topics();
        if topics.len() >= 4 && topics[0] == TRANSFER_EVENT_SIGNATURE {
            agent_id = u64::try_from(U256::from_be_bytes(topics[3].0)).ok();
        }
    }
    agent_id
}
