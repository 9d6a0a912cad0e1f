//! Chain store
//!
//! The single source of truth for the held chain. The store owns the
//! backing sequence exclusively; all growth goes through `add_block` and
//! all wholesale replacement through `replace_chain`.

use crate::core::block::{Block, BlockError, BlockHeader};
use crate::core::consensus::{self, CoinFlip, TieBreak};
use crate::crypto::merkle_root;
use chrono::Utc;
use thiserror::Error;

/// Chain-level validation errors
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("candidate chain is empty")]
    Empty,
    #[error("candidate genesis does not match the canonical genesis block")]
    Genesis,
    #[error("invalid block at index {index}: {source}")]
    Block {
        index: u64,
        #[source]
        source: BlockError,
    },
}

/// The held chain of blocks, genesis first
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Blockchain {
    /// Create a chain holding only the genesis block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Read-only view of the chain
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the latest block
    pub fn latest_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Get a block by index
    pub fn get_block(&self, index: u64) -> Option<&Block> {
        self.blocks.get(index as usize)
    }

    /// Chain height (index of the latest block)
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64 - 1
    }

    /// Append a candidate block if it validly extends the latest block.
    ///
    /// On rejection the store is left unchanged. This is the single entry
    /// point for incremental growth.
    pub fn add_block(&mut self, block: Block) -> Result<(), BlockError> {
        block.validate_against(self.latest_block())?;
        self.blocks.push(block);
        Ok(())
    }

    /// Build the next block over the given payload and append it.
    ///
    /// The block is constructed to satisfy every invariant against the
    /// current latest block, then funnelled through `add_block` like any
    /// other candidate.
    pub fn generate_next_block(&mut self, data: Vec<String>) -> Result<Block, BlockError> {
        let previous = self.latest_block();
        let header = BlockHeader {
            version: env!("CARGO_PKG_VERSION").to_string(),
            index: previous.header.index + 1,
            previous_hash: previous.hash(),
            timestamp: Utc::now().timestamp(),
            merkle_root: merkle_root(&data),
        };
        let block = Block::new(header, data);
        self.add_block(block.clone())?;
        Ok(block)
    }

    /// Validate a candidate chain on its own terms.
    ///
    /// The walk never cross-references the held chain: element 0 must be
    /// value-equal to the canonical genesis block, and each subsequent
    /// element must validate against the previous candidate element.
    pub fn is_valid_chain(candidate: &[Block]) -> Result<(), ChainError> {
        let first = candidate.first().ok_or(ChainError::Empty)?;
        if *first != Block::genesis() {
            return Err(ChainError::Genesis);
        }

        for window in candidate.windows(2) {
            window[1]
                .validate_against(&window[0])
                .map_err(|source| ChainError::Block {
                    index: window[1].header.index,
                    source,
                })?;
        }

        Ok(())
    }

    /// Adopt `candidate` under the longest-chain rule with a fair coin on
    /// equal lengths.
    ///
    /// Returns `Ok(true)` and swaps the store atomically when the candidate
    /// wins, `Ok(false)` when the held chain is kept, and `Err` when the
    /// candidate fails validation. No partial adoption ever happens.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> Result<bool, ChainError> {
        self.replace_chain_with(candidate, &mut CoinFlip)
    }

    /// `replace_chain` with an injected tie-break source
    pub fn replace_chain_with(
        &mut self,
        candidate: Vec<Block>,
        tie: &mut dyn TieBreak,
    ) -> Result<bool, ChainError> {
        Self::is_valid_chain(&candidate)?;

        if consensus::should_adopt(self.blocks.len(), candidate.len(), tie) {
            self.blocks = candidate;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
