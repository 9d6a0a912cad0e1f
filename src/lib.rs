//! Hashchain: a distributed append-only ledger of opaque data blocks
//!
//! This crate provides a small blockchain node featuring:
//! - Hash-chained blocks with merkle-bound opaque payloads
//! - A fixed, bit-identical genesis block across all nodes
//! - Longest-chain consensus with a random tie-break on equal lengths
//! - A TCP peer synchronization protocol (query latest, query all,
//!   response blockchain) with broadcast fan-out
//! - A REST API shell for mining and peer management
//!
//! # Example
//!
//! ```rust
//! use hashchain::core::Blockchain;
//!
//! let mut chain = Blockchain::new();
//! let block = chain.generate_next_block(vec!["hello".to_string()]).unwrap();
//!
//! assert_eq!(chain.height(), 1);
//! assert_eq!(block.header.previous_hash, chain.blocks()[0].hash());
//! assert!(Blockchain::is_valid_chain(chain.blocks()).is_ok());
//! ```

pub mod api;
pub mod core;
pub mod crypto;
pub mod network;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use core::{Block, BlockError, BlockHeader, Blockchain, ChainError};
pub use crypto::{hash_header, merkle_root, ZERO_HASH};
pub use network::{ChainSync, Message, Node, NodeConfig, PeerManager};
