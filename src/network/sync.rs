//! Chain reconciliation driven by peer messages
//!
//! Decides, for every received block sequence, whether to append a single
//! block, re-query the peer set for full chains, or wholesale-replace the
//! held chain.

use crate::core::{Block, Blockchain};
use crate::network::message::Message;
use crate::network::peer::PeerManager;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Chain synchronization manager
pub struct ChainSync {
    blockchain: Arc<RwLock<Blockchain>>,
    peer_manager: Arc<PeerManager>,
}

impl ChainSync {
    pub fn new(blockchain: Arc<RwLock<Blockchain>>, peer_manager: Arc<PeerManager>) -> Self {
        Self {
            blockchain,
            peer_manager,
        }
    }

    /// `ResponseBlockchain` carrying only the local latest block
    pub async fn latest_response(&self) -> Message {
        let chain = self.blockchain.read().await;
        Message::ResponseBlockchain(vec![chain.latest_block().clone()])
    }

    /// `ResponseBlockchain` carrying the full local chain
    pub async fn chain_response(&self) -> Message {
        let chain = self.blockchain.read().await;
        Message::ResponseBlockchain(chain.blocks().to_vec())
    }

    /// Announce the current latest block to every connected peer
    pub async fn broadcast_latest(&self) {
        let msg = self.latest_response().await;
        self.peer_manager.broadcast(msg).await;
    }

    /// Reconcile a received block sequence against the held chain.
    ///
    /// The write lock is held across the whole read-validate-mutate
    /// sequence so concurrent peer updates serialize instead of
    /// interleaving.
    pub async fn handle_blockchain_response(&self, received: Vec<Block>) {
        let received_latest = match received.last() {
            Some(block) => block.clone(),
            None => {
                log::warn!("Received empty block sequence, ignoring");
                return;
            }
        };

        let mut chain = self.blockchain.write().await;

        if received_latest.header.index <= chain.latest_block().header.index {
            log::debug!(
                "Local chain already at height {}, nothing to do",
                chain.height()
            );
            return;
        }

        if chain.latest_block().hash() == received_latest.header.previous_hash {
            // Peer is exactly one block ahead and linked to local history
            match chain.add_block(received_latest) {
                Ok(()) => {
                    log::info!("Appended block {} from peer", chain.height());
                    let announce = Message::ResponseBlockchain(vec![chain.latest_block().clone()]);
                    drop(chain);
                    self.peer_manager.broadcast(announce).await;
                }
                Err(e) => log::warn!("Rejected peer block: {}", e),
            }
        } else if received.len() == 1 {
            // Ahead but not directly linkable from a single block; ask the
            // whole peer set for full chains
            log::info!(
                "Peer ahead at index {} with unknown history, querying all peers",
                received_latest.header.index
            );
            drop(chain);
            self.peer_manager.broadcast(Message::QueryAll).await;
        } else {
            // A full competing chain
            match chain.replace_chain(received) {
                Ok(true) => {
                    log::info!("Adopted peer chain, height now {}", chain.height());
                    let announce = Message::ResponseBlockchain(vec![chain.latest_block().clone()]);
                    drop(chain);
                    self.peer_manager.broadcast(announce).await;
                }
                Ok(false) => log::debug!("Kept local chain over equal or shorter candidate"),
                Err(e) => log::warn!("Rejected peer chain: {}", e),
            }
        }
    }
}
