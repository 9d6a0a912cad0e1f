//! P2P networking module
//!
//! Provides peer-to-peer synchronization of the ledger:
//! - TCP-based peer connections with length-prefixed framing
//! - The query/response peer protocol
//! - Broadcast fan-out to all connected peers
//! - Chain reconciliation (append, re-query, or replace)

pub mod message;
pub mod node;
pub mod peer;
pub mod server;
pub mod sync;

pub use message::{Message, MessageError, MAGIC};
pub use node::{Node, NodeConfig};
pub use peer::{PeerError, PeerHandle, PeerManager};
pub use server::{connect_to_peer, MessageCodec, Server};
pub use sync::ChainSync;
