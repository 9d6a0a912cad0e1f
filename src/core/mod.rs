//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Blocks (header + opaque payload, merkle-bound)
//! - Blockchain (the held chain and its validation walk)
//! - Consensus (longest-chain replacement with random tie-break)

pub mod block;
pub mod blockchain;
pub mod consensus;

pub use block::{Block, BlockError, BlockHeader, GENESIS_DATA, GENESIS_TIMESTAMP, GENESIS_VERSION};
pub use blockchain::{Blockchain, ChainError};
pub use consensus::{should_adopt, CoinFlip, Fixed, RngTieBreak, TieBreak};
