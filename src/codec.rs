use base64::Engine;
use serde_json::{json, Value};

use crate::error::Error;

/// Scheme marker for self-contained JSON metadata URIs
pub const DATA_URI_PREFIX: &str = "data:application/json;base64,";

/// Schema-version URI stamped into registration metadata
pub const REGISTRATION_TYPE: &str = "https://eips.ethereum.org/EIPS/eip-8004#registration-v1";

/// Encode a metadata object as a self-contained data URI.
///
/// The object is serialized to JSON, base64-encoded and prefixed with
/// `data:application/json;base64,`. Round-trips through
/// [`decode_data_uri`] for any JSON value, including non-ASCII text.
pub fn encode_data_uri(metadata: &Value) -> Result<String, Error> {
    let json_str = serde_json::to_string(metadata)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(json_str.as_bytes());
    Ok(format!("{DATA_URI_PREFIX}{encoded}"))
}

/// Decode a data URI back into a metadata object.
pub fn decode_data_uri(uri: &str) -> Result<Value, Error> {
    let payload = uri.strip_prefix(DATA_URI_PREFIX).ok_or_else(|| {
        Error::InvalidDataUri(format!("expected '{DATA_URI_PREFIX}' prefix"))
    })?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::MalformedJson(format!("base64 decode error: {e}")))?;

    serde_json::from_slice(&decoded).map_err(|e| Error::MalformedJson(e.to_string()))
}

/// Build the canonical registration metadata object.
///
/// `name` is the only required field; `supported_trust` defaults to
/// `["reputation"]` when absent.
pub fn registration_metadata(
    name: &str,
    description: &str,
    image: &str,
    services: Vec<Value>,
    supported_trust: Option<Vec<String>>,
) -> Value {
    json!({
        "type": REGISTRATION_TYPE,
        "name": name,
        "description": description,
        "image": image,
        "services": services,
        "supportedTrust": supported_trust.unwrap_or_else(|| vec!["reputation".to_string()]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let metadata = json!({"name": "Test Agent", "value": 123});
        let uri = encode_data_uri(&metadata).unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));
        assert_eq!(decode_data_uri(&uri).unwrap(), metadata);
    }

    #[test]
    fn test_data_uri_round_trip_unicode() {
        let metadata = json!({
            "name": "🤖 Agent émoji",
            "description": "日本語のエージェント",
        });
        let uri = encode_data_uri(&metadata).unwrap();
        assert_eq!(decode_data_uri(&uri).unwrap(), metadata);
    }

    #[test]
    fn test_data_uri_round_trip_nested() {
        let metadata = json!({
            "name": "Nested",
            "services": [{"name": "api", "endpoint": "https://example.com"}],
            "extra": {"deep": {"list": [1, 2, 3]}},
        });
        let uri = encode_data_uri(&metadata).unwrap();
        assert_eq!(decode_data_uri(&uri).unwrap(), metadata);
    }

    #[test]
    fn test_decode_rejects_wrong_prefix() {
        for uri in [
            "not a data uri",
            "data:text/plain;base64,abc",
            "http://example.com/metadata.json",
            "",
        ] {
            assert!(matches!(
                decode_data_uri(uri),
                Err(Error::InvalidDataUri(_))
            ));
        }
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let uri = format!("{DATA_URI_PREFIX}!!!not-base64!!!");
        assert!(matches!(decode_data_uri(&uri), Err(Error::MalformedJson(_))));
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("not json at all");
        let uri = format!("{DATA_URI_PREFIX}{encoded}");
        assert!(matches!(decode_data_uri(&uri), Err(Error::MalformedJson(_))));
    }

    #[test]
    fn test_registration_metadata_defaults() {
        let metadata = registration_metadata("X", "", "", vec![], None);
        assert_eq!(metadata["type"], REGISTRATION_TYPE);
        assert_eq!(metadata["name"], "X");
        assert_eq!(metadata["description"], "");
        assert_eq!(metadata["image"], "");
        assert_eq!(metadata["services"], json!([]));
        assert_eq!(metadata["supportedTrust"], json!(["reputation"]));
    }

    #[test]
    fn test_registration_metadata_explicit() {
        let services = vec![json!({"name": "a2a", "endpoint": "https://agent.example"})];
        let metadata = registration_metadata(
            "My Agent",
            "Does things",
            "https://example.com/avatar.png",
            services,
            Some(vec!["reputation".to_string(), "validation".to_string()]),
        );
        assert_eq!(metadata["name"], "My Agent");
        assert_eq!(metadata["description"], "Does things");
        assert_eq!(metadata["services"][0]["endpoint"], "https://agent.example");
        assert_eq!(
            metadata["supportedTrust"],
            json!(["reputation", "validation"])
        );
    }
}
