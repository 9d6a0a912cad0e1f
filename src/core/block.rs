//! Block implementation for the ledger
//!
//! A block owns a header and an ordered payload of opaque strings. The
//! payload is bound into the header through its merkle root; the block's
//! identity hash covers only the header fields.

use crate::crypto::{hash_header, is_digest, merkle_root, ZERO_HASH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version string carried by the genesis block
pub const GENESIS_VERSION: &str = "1.0.o";

/// Fixed genesis timestamp (Unix seconds)
pub const GENESIS_TIMESTAMP: i64 = 1231006505;

/// Fixed single-element genesis payload
pub const GENESIS_DATA: &str = "컴퓨터과학으로 배우는 블록체인 원리와 구현 실습";

/// Block validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlockError {
    #[error("malformed header field: {0}")]
    Structure(&'static str),
    #[error("invalid index: expected {expected}, got {got}")]
    Index { expected: u64, got: u64 },
    #[error("previous hash does not match predecessor")]
    PreviousHash,
    #[error("merkle root does not match data payload")]
    MerkleRoot,
}

/// Block header containing all hashed metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Version of the node that produced this block
    pub version: String,
    /// Block height, strictly sequential from 0
    pub index: u64,
    /// Digest of the previous block's header (zero sentinel for genesis)
    pub previous_hash: String,
    /// Creation time in Unix seconds
    pub timestamp: i64,
    /// Merkle root of the data payload (zero sentinel when data is empty)
    pub merkle_root: String,
}

/// A block in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// Ordered opaque payload
    pub data: Vec<String>,
}

impl Block {
    /// Create a block from its parts
    pub fn new(header: BlockHeader, data: Vec<String>) -> Self {
        Self { header, data }
    }

    /// The fixed first block of every valid chain.
    ///
    /// Reconstructed on demand; callers compare candidates against it by
    /// value, so every call must produce an identical block.
    pub fn genesis() -> Self {
        let data = vec![GENESIS_DATA.to_string()];
        let header = BlockHeader {
            version: GENESIS_VERSION.to_string(),
            index: 0,
            previous_hash: ZERO_HASH.to_string(),
            timestamp: GENESIS_TIMESTAMP,
            merkle_root: merkle_root(&data),
        };
        Self { header, data }
    }

    /// Identity digest of this block
    pub fn hash(&self) -> String {
        hash_header(
            &self.header.version,
            self.header.index,
            &self.header.previous_hash,
            self.header.timestamp,
            &self.header.merkle_root,
        )
    }

    /// Check the shape of the header's digest fields.
    ///
    /// Field presence and primitive types are already guaranteed by
    /// deserialization; the remaining runtime check is that both digest
    /// fields carry well-formed 64-character hex strings.
    pub fn validate_structure(&self) -> Result<(), BlockError> {
        if !is_digest(&self.header.previous_hash) {
            return Err(BlockError::Structure("previousHash"));
        }
        if !is_digest(&self.header.merkle_root) {
            return Err(BlockError::Structure("merkleRoot"));
        }
        Ok(())
    }

    /// Validate this block as the direct successor of `previous`.
    ///
    /// Checks run in order and stop at the first failure: structure, index
    /// continuity, previous-hash linkage, merkle consistency. An empty
    /// payload must carry the zero sentinel as its merkle root.
    pub fn validate_against(&self, previous: &Block) -> Result<(), BlockError> {
        self.validate_structure()?;

        let expected_index = previous.header.index + 1;
        if self.header.index != expected_index {
            return Err(BlockError::Index {
                expected: expected_index,
                got: self.header.index,
            });
        }

        if previous.hash() != self.header.previous_hash {
            return Err(BlockError::PreviousHash);
        }

        // merkle_root() maps an empty payload to the zero sentinel, so one
        // comparison covers both the empty and non-empty cases.
        if merkle_root(&self.data) != self.header.merkle_root {
            return Err(BlockError::MerkleRoot);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_block(previous: &Block, data: Vec<String>) -> Block {
        let header = BlockHeader {
            version: "0.1.0".to_string(),
            index: previous.header.index + 1,
            previous_hash: previous.hash(),
            timestamp: previous.header.timestamp + 1,
            merkle_root: merkle_root(&data),
        };
        Block::new(header, data)
    }

    #[test]
    fn test_genesis_is_deterministic() {
        assert_eq!(Block::genesis(), Block::genesis());
    }

    #[test]
    fn test_genesis_fields() {
        let genesis = Block::genesis();
        assert_eq!(genesis.header.index, 0);
        assert_eq!(genesis.header.previous_hash, ZERO_HASH);
        assert_eq!(genesis.header.timestamp, GENESIS_TIMESTAMP);
        assert_eq!(genesis.data, vec![GENESIS_DATA.to_string()]);
        assert_eq!(genesis.header.merkle_root, merkle_root(&genesis.data));
        assert!(genesis.validate_structure().is_ok());
    }

    #[test]
    fn test_valid_successor() {
        let genesis = Block::genesis();
        let block = next_block(&genesis, vec!["payload".to_string()]);
        assert!(block.validate_against(&genesis).is_ok());
    }

    #[test]
    fn test_empty_payload_uses_zero_sentinel() {
        let genesis = Block::genesis();
        let block = next_block(&genesis, vec![]);
        assert_eq!(block.header.merkle_root, ZERO_HASH);
        assert!(block.validate_against(&genesis).is_ok());
    }

    #[test]
    fn test_rejects_bad_index() {
        let genesis = Block::genesis();
        let mut block = next_block(&genesis, vec!["payload".to_string()]);
        block.header.index = 5;
        assert_eq!(
            block.validate_against(&genesis),
            Err(BlockError::Index {
                expected: 1,
                got: 5
            })
        );
    }

    #[test]
    fn test_rejects_bad_previous_hash() {
        let genesis = Block::genesis();
        let mut block = next_block(&genesis, vec!["payload".to_string()]);
        block.header.previous_hash = ZERO_HASH.to_string();
        assert_eq!(
            block.validate_against(&genesis),
            Err(BlockError::PreviousHash)
        );
    }

    #[test]
    fn test_rejects_tampered_merkle_root() {
        let genesis = Block::genesis();
        let mut block = next_block(&genesis, vec!["payload".to_string()]);
        block.header.merkle_root = ZERO_HASH.to_string();
        assert_eq!(block.validate_against(&genesis), Err(BlockError::MerkleRoot));
    }

    #[test]
    fn test_rejects_malformed_digest_fields() {
        let genesis = Block::genesis();
        let mut block = next_block(&genesis, vec!["payload".to_string()]);
        block.header.previous_hash = "not-a-digest".to_string();
        assert_eq!(
            block.validate_against(&genesis),
            Err(BlockError::Structure("previousHash"))
        );
    }

    #[test]
    fn test_structure_failure_reported_before_linkage() {
        let genesis = Block::genesis();
        let mut block = next_block(&genesis, vec!["payload".to_string()]);
        block.header.index = 9;
        block.header.merkle_root = "short".to_string();
        // Structural check wins even though the index is also wrong
        assert_eq!(
            block.validate_against(&genesis),
            Err(BlockError::Structure("merkleRoot"))
        );
    }

    #[test]
    fn test_header_serializes_camel_case() {
        let json = serde_json::to_string(&Block::genesis()).unwrap();
        assert!(json.contains("\"previousHash\""));
        assert!(json.contains("\"merkleRoot\""));
    }
}
