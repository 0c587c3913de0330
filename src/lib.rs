//! ERC-8004 agent identity and reputation client.
//!
//! Read and write access to the on-chain identity and reputation
//! registries, plus the data URI codec used for self-contained agent
//! metadata.

pub mod abi;
pub mod client;
pub mod codec;
pub mod error;
pub mod networks;
pub mod types;
pub mod wallet;

pub use client::Erc8004Client;
pub use error::Error;
pub use types::{
    Agent, AgentUri, FeedbackResult, NetworkInfo, RegistrationResult, ReputationSummary,
    UriUpdateResult,
};
