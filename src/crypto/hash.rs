//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 based digest functions used for block header
//! hashes and merkle tree calculations. All digests are rendered as
//! 64-character uppercase hexadecimal strings.

use sha2::{Digest, Sha256};

/// Length of a rendered digest in hex characters
pub const DIGEST_LEN: usize = 64;

/// Sentinel digest of 64 zero characters.
///
/// Used as the previous hash of the genesis block and as the merkle root
/// of an empty data payload.
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Computes SHA-256 of the input and returns it as uppercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode_upper(hasher.finalize())
}

/// Computes the identity digest of a block header.
///
/// The five header fields are concatenated in order using their textual
/// representation, so any node can reproduce a peer's claimed hash from
/// the header fields alone.
pub fn hash_header(
    version: &str,
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    merkle_root: &str,
) -> String {
    let data = format!(
        "{}{}{}{}{}",
        version, index, previous_hash, timestamp, merkle_root
    );
    sha256_hex(data.as_bytes())
}

/// Checks that a string has the shape of a rendered digest
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9"
        );
    }

    #[test]
    fn test_hash_header_deterministic() {
        let a = hash_header("1.0.0", 1, ZERO_HASH, 1231006505, ZERO_HASH);
        let b = hash_header("1.0.0", 1, ZERO_HASH, 1231006505, ZERO_HASH);
        assert_eq!(a, b);
        assert!(is_digest(&a));
    }

    #[test]
    fn test_hash_header_sensitive_to_fields() {
        let base = hash_header("1.0.0", 1, ZERO_HASH, 1231006505, ZERO_HASH);
        assert_ne!(
            base,
            hash_header("1.0.1", 1, ZERO_HASH, 1231006505, ZERO_HASH)
        );
        assert_ne!(
            base,
            hash_header("1.0.0", 2, ZERO_HASH, 1231006505, ZERO_HASH)
        );
        assert_ne!(
            base,
            hash_header("1.0.0", 1, ZERO_HASH, 1231006506, ZERO_HASH)
        );
    }

    #[test]
    fn test_is_digest() {
        assert!(is_digest(ZERO_HASH));
        assert!(is_digest(&sha256_hex(b"x")));
        assert!(!is_digest("abc"));
        assert!(!is_digest(&"Z".repeat(64)));
    }
}
