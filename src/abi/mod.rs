use alloy::primitives::{b256, B256};
use alloy::sol;

// keccak256("Transfer(address,address,uint256)"); registration mints emit
// this with from = zero address and tokenId = the new agent id
pub const TRANSFER_EVENT_SIGNATURE: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

// ERC-8004 Identity Registry contract interface
// ERC-721 based; agent ids are token ids
sol! {
    #[sol(rpc)]
    interface IIdentityRegistry {
        // ERC-721 standard
        function ownerOf(uint256 agentId) external view returns (address);
        function balanceOf(address owner) external view returns (uint256);
        function tokenURI(uint256 agentId) external view returns (string memory);

        // Registration, three shapes in declaration order: URI plus
        // metadata entries, URI only, bare
        function register(string calldata agentURI, MetadataEntry[] calldata metadata) external returns (uint256 agentId);
        function register(string calldata agentURI) external returns (uint256 agentId);
        function register() external returns (uint256 agentId);

        // Updates
        function setAgentURI(uint256 agentId, string calldata newURI) external;
        function setMetadata(uint256 agentId, string calldata metadataKey, bytes calldata metadataValue) external;
        function setAgentWallet(uint256 agentId, address newWallet, uint256 deadline, bytes calldata signature) external;
        function unsetAgentWallet(uint256 agentId) external;

        // EIP-8004 specific reads
        function getAgentWallet(uint256 agentId) external view returns (address);
        function getMetadata(uint256 agentId, string calldata metadataKey) external view returns (bytes memory);

        // Events
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event Registered(uint256 indexed agentId, string agentURI, address indexed owner);
        event URIUpdated(uint256 indexed agentId, string newURI, address indexed updatedBy);

        // Errors
        error ERC721NonexistentToken(uint256 tokenId);
    }

    // Key-value metadata attached at registration
    struct MetadataEntry {
        string metadataKey;
        bytes metadataValue;
    }
}

// ERC-8004 Reputation Registry contract interface
sol! {
    #[sol(rpc)]
    interface IReputationRegistry {
        // Submit feedback for an agent
        function giveFeedback(
            uint256 agentId,
            int128 value,
            uint8 valueDecimals,
            string calldata tag1,
            string calldata tag2,
            string calldata endpoint,
            string calldata feedbackURI,
            bytes32 feedbackHash
        ) external;

        // Revoke previously submitted feedback
        function revokeFeedback(uint256 agentId, uint64 feedbackIndex) external;

        // Agent's reply to a feedback entry
        function appendResponse(
            uint256 agentId,
            address clientAddress,
            uint64 feedbackIndex,
            string calldata responseURI,
            bytes32 responseHash
        ) external;

        // Aggregate summary over an explicit reviewer set
        function getSummary(
            uint256 agentId,
            address[] calldata clientAddresses,
            string calldata tag1,
            string calldata tag2
        ) external view returns (uint64 count, int128 summaryValue, uint8 summaryValueDecimals);

        // Feedback reads
        function readFeedback(uint256 agentId, address clientAddress, uint64 index)
            external view returns (int128 value, uint8 valueDecimals, string memory tag1, string memory tag2, bool isRevoked);
        function readAllFeedback(
            uint256 agentId,
            address[] calldata clientAddresses,
            string calldata tag1,
            string calldata tag2,
            bool includeRevoked
        ) external view returns (
            address[] memory clients,
            uint64[] memory feedbackIndexes,
            int128[] memory values,
            uint8[] memory valueDecimals,
            string[] memory tag1s,
            string[] memory tag2s,
            bool[] memory revokedStatuses
        );
        function getResponseCount(uint256 agentId, address clientAddress, uint64 feedbackIndex, address[] calldata responders) external view returns (uint64 count);
        function getClients(uint256 agentId) external view returns (address[] memory);
        function getLastIndex(uint256 agentId, address clientAddress) external view returns (uint64);
        function getIdentityRegistry() external view returns (address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_transfer_signature_matches_declared_event() {
        assert_eq!(TRANSFER_EVENT_SIGNATURE, IIdentityRegistry::Transfer::SIGNATURE_HASH);
    }

    #[test]
    fn test_erc721_selectors() {
        // Well-known ERC-721 selectors
        assert_eq!(
            IIdentityRegistry::ownerOfCall::SELECTOR,
            [0x63, 0x52, 0x21, 0x1e]
        );
        assert_eq!(
            IIdentityRegistry::balanceOfCall::SELECTOR,
            [0x70, 0xa0, 0x82, 0x31]
        );
        assert_eq!(
            IIdentityRegistry::tokenURICall::SELECTOR,
            [0xc8, 0x7b, 0x56, 0xdd]
        );
    }

    #[test]
    fn test_register_overloads_encode() {
        let bare = IIdentityRegistry::register_2Call {};
        let with_uri = IIdentityRegistry::register_1Call {
            agentURI: "data:application/json;base64,e30=".to_string(),
        };
        assert_eq!(bare.abi_encode().len(), 4);
        assert!(with_uri.abi_encode().len() > 4);
        assert_ne!(
            IIdentityRegistry::register_1Call::SELECTOR,
            IIdentityRegistry::register_2Call::SELECTOR
        );
    }

    #[test]
    fn test_give_feedback_encodes() {
        let call = IReputationRegistry::giveFeedbackCall {
            agentId: U256::from(1u64),
            value: 450i128,
            valueDecimals: 2u8,
            tag1: String::new(),
            tag2: String::new(),
            endpoint: String::new(),
            feedbackURI: String::new(),
            feedbackHash: B256::ZERO,
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], IReputationRegistry::giveFeedbackCall::SELECTOR);
    }
}
