//! Signing key handling.

use alloy::signers::local::PrivateKeySigner;

use crate::error::Error;

/// Parse a hex private key into a local signer.
///
/// Accepts the key with or without a leading `0x`.
pub fn derive_signer(private_key: &str) -> Result<PrivateKeySigner, Error> {
    let key = private_key.strip_prefix("0x").unwrap_or(private_key);
    key.parse()
        .map_err(|e| Error::InvalidKey(format!("{}", e)))
}

/// Checksummed address for a private key.
pub fn derive_address(private_key: &str) -> Result<String, Error> {
    Ok(derive_signer(private_key)?.address().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known test key (Anvil account 0)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_derive_address() {
        let address = derive_address(TEST_KEY).unwrap();
        assert_eq!(
            address.to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_derive_signer_without_prefix() {
        let bare = TEST_KEY.strip_prefix("0x").unwrap();
        let with_prefix = derive_signer(TEST_KEY).unwrap();
        let without_prefix = derive_signer(bare).unwrap();
        assert_eq!(with_prefix.address(), without_prefix.address());
    }

    #[test]
    fn test_derive_signer_rejects_garbage() {
        assert!(matches!(derive_signer("not-a-key"), Err(Error::InvalidKey(_))));
        assert!(matches!(derive_signer("0x1234"), Err(Error::InvalidKey(_))));
    }
}
