//! SHA-256 hashing implementation
//!
//! All digests in Tally are lowercase 64-character hex strings. Block
//! digests are computed over a canonical key-sorted JSON rendering so
//! that structurally equal blocks hash identically on every node.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hash arbitrary bytes, returning the lowercase hex digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash a serializable value through its canonical JSON form.
///
/// The value is first converted to a `serde_json::Value`, whose object
/// maps are BTreeMap-backed and therefore key-sorted. Field declaration
/// order never leaks into the digest.
pub fn canonical_digest<T: Serialize>(value: &T) -> String {
    let canonical = serde_json::to_value(value)
        .expect("in-memory ledger types always serialize to JSON");
    sha256_hex(canonical.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sha256_hex_deterministic() {
        let hash1 = sha256_hex(b"hello world");
        let hash2 = sha256_hex(b"hello world");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_sha256_hex_shape() {
        let hash = sha256_hex(b"tally");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        assert_ne!(sha256_hex(b"hello"), sha256_hex(b"world"));
    }

    #[test]
    fn test_canonical_digest_ignores_key_order() {
        // Same logical object built in two insertion orders
        let a = json!({"sender": "alice", "recipient": "bob", "amount": 5.0});
        let b = json!({"amount": 5.0, "recipient": "bob", "sender": "alice"});
        assert_eq!(canonical_digest(&a), canonical_digest(&b));
    }

    #[test]
    fn test_canonical_digest_sensitive_to_content() {
        let a = json!({"amount": 5.0});
        let b = json!({"amount": 6.0});
        assert_ne!(canonical_digest(&a), canonical_digest(&b));
    }
}
