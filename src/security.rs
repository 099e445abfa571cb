//! API key generation, hashing and comparison.
//!
//! Raw keys look like `sk_test_<48 hex chars>`. Only the hex-encoded SHA-256
//! of the raw key is ever persisted.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Display prefix stored alongside every key.
pub const KEY_PREFIX: &str = "sk_test";

/// Random bytes per key (48 hex characters).
const KEY_BYTES: usize = 24;

/// Generate a fresh raw API key.
pub fn generate_api_key() -> String {
    let bytes: [u8; KEY_BYTES] = rand::random();
    format!("{KEY_PREFIX}_{}", hex::encode(bytes))
}

/// SHA-256 of the raw key, hex encoded (64 characters).
pub fn hash_api_key(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of two hex digests.
pub fn hashes_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_have_prefix_and_length() {
        let key = generate_api_key();
        assert!(key.starts_with("sk_test_"));
        assert_eq!(key.len(), "sk_test_".len() + KEY_BYTES * 2);
        assert!(key["sk_test_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_keys_are_unique() {
        assert_ne!(generate_api_key(), generate_api_key());
    }

    #[test]
    fn hash_is_stable_sha256_hex() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_api_key("sk_test_1"), hash_api_key("sk_test_1"));
    }

    #[test]
    fn hashes_match_is_exact() {
        let h = hash_api_key("sk_test_1");
        assert!(hashes_match(&h, &hash_api_key("sk_test_1")));
        assert!(!hashes_match(&h, &hash_api_key("sk_test_2")));
        assert!(!hashes_match(&h, &h[..10]));
    }
}
