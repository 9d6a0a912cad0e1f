//! Cryptographic utilities for the ledger
//!
//! This module provides:
//! - SHA-256 header digests (uppercase hex)
//! - Merkle root calculation over opaque payloads

pub mod hash;
pub mod merkle;

pub use hash::{hash_header, is_digest, sha256_hex, DIGEST_LEN, ZERO_HASH};
pub use merkle::merkle_root;
