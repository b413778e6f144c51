//! Hashing utilities for decoration identity.

use crate::types::Position;
use sha2::{Digest, Sha256};

/// Prefix shared by all fragment ids.
pub const FRAGMENT_ID_PREFIX: &str = "lmd-";

/// Hex characters of the digest kept in a fragment id.
const FRAGMENT_ID_HEX_LEN: usize = 16;

/// Computes SHA-256 hash of data and returns hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Computes SHA-256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_hex(s.as_bytes())
}

/// Deterministic identity of a rendered fragment.
///
/// The inputs are hashed as a JSON array so that no field boundary can be
/// forged by the field contents themselves.
pub fn fragment_id(rule_id: &str, position: Position, text: &str, icon: &str) -> String {
    let identity = serde_json::json!([rule_id, position.as_str(), text, icon]).to_string();
    let digest = sha256_str(&identity);
    format!("{}{}", FRAGMENT_ID_PREFIX, &digest[..FRAGMENT_ID_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let hash = sha256_str("hello");
        assert_eq!(hash.len(), 64); // SHA-256 is 32 bytes = 64 hex chars
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_fragment_id_is_stable() {
        let a = fragment_id("r1", Position::After, "!", "star");
        let b = fragment_id("r1", Position::After, "!", "star");
        assert_eq!(a, b);
        assert!(a.starts_with(FRAGMENT_ID_PREFIX));
        assert_eq!(a.len(), FRAGMENT_ID_PREFIX.len() + FRAGMENT_ID_HEX_LEN);
    }

    #[test]
    fn test_fragment_id_separates_inputs() {
        let base = fragment_id("r1", Position::After, "!", "star");
        assert_ne!(base, fragment_id("r2", Position::After, "!", "star"));
        assert_ne!(base, fragment_id("r1", Position::Before, "!", "star"));
        assert_ne!(base, fragment_id("r1", Position::After, "?", "star"));
        assert_ne!(
            fragment_id("r1", Position::After, "a", "b"),
            fragment_id("r1", Position::After, "", "ab")
        );
    }
}
