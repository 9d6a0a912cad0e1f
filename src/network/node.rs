//! P2P node implementation
//!
//! Orchestrates the listener, per-connection tasks, and the dispatch loop
//! that feeds peer messages into chain reconciliation.

use crate::core::Blockchain;
use crate::network::message::Message;
use crate::network::peer::{PeerError, PeerManager};
use crate::network::server::{connect_to_peer, handle_connection, Server};
use crate::network::sync::ChainSync;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

/// P2P node configuration
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Port to listen on for peer connections
    pub port: u16,
    /// Initial peers to connect to
    pub bootstrap_peers: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: 6001,
            bootstrap_peers: Vec::new(),
        }
    }
}

/// The P2P node
pub struct Node {
    pub config: NodeConfig,
    pub blockchain: Arc<RwLock<Blockchain>>,
    pub peer_manager: Arc<PeerManager>,
    pub chain_sync: Arc<ChainSync>,
    message_tx: mpsc::Sender<(SocketAddr, Message)>,
    message_rx: Mutex<Option<mpsc::Receiver<(SocketAddr, Message)>>>,
}

impl Node {
    /// Create a node over a fresh chain
    pub fn new(config: NodeConfig) -> Self {
        let blockchain = Arc::new(RwLock::new(Blockchain::new()));
        let peer_manager = Arc::new(PeerManager::new());
        Self::with_shared(config, blockchain, peer_manager)
    }

    /// Create a node over shared state.
    ///
    /// The REST shell and the P2P node share one chain store and one peer
    /// manager, so blocks mined over HTTP reach connected peers.
    pub fn with_shared(
        config: NodeConfig,
        blockchain: Arc<RwLock<Blockchain>>,
        peer_manager: Arc<PeerManager>,
    ) -> Self {
        let chain_sync = Arc::new(ChainSync::new(blockchain.clone(), peer_manager.clone()));
        let (message_tx, message_rx) = mpsc::channel(1000);

        Self {
            config,
            blockchain,
            peer_manager,
            chain_sync,
            message_tx,
            message_rx: Mutex::new(Some(message_rx)),
        }
    }

    /// Start the node: accept connections, dial bootstrap peers, and
    /// dispatch peer messages. Runs until the message channel closes.
    pub async fn start(&self) -> Result<(), PeerError> {
        let mut message_rx = self
            .message_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| PeerError::ConnectionFailed("node already started".to_string()))?;

        let server = Server::bind(self.config.port).await?;
        log::info!("Node started on port {}", server.port());

        let accept_peer_manager = self.peer_manager.clone();
        let accept_message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            loop {
                match server.accept().await {
                    Ok((stream, addr)) => {
                        log::info!("Incoming connection from {}", addr);
                        let pm = accept_peer_manager.clone();
                        let tx = accept_message_tx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, addr, pm, tx, false).await {
                                log::warn!("Connection error with {}: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        log::error!("Accept error: {}", e);
                    }
                }
            }
        });

        for peer in &self.config.bootstrap_peers {
            if let Err(e) = self.connect_to(peer).await {
                log::warn!("Failed to connect to bootstrap peer {}: {}", peer, e);
            }
        }

        while let Some((from, msg)) = message_rx.recv().await {
            self.handle_message(from, msg).await;
        }

        Ok(())
    }

    /// Dial and register a new peer
    pub async fn connect_to(&self, addr: &str) -> Result<(), PeerError> {
        log::info!("Connecting to peer: {}", addr);

        let (stream, peer_addr) = connect_to_peer(addr).await?;

        let pm = self.peer_manager.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, pm, tx, true).await {
                log::warn!("Connection error with {}: {}", peer_addr, e);
            }
        });

        Ok(())
    }

    /// Announce the local latest block to all connected peers
    pub async fn broadcast_latest(&self) {
        self.chain_sync.broadcast_latest().await;
    }

    /// Handle one incoming peer message
    async fn handle_message(&self, from: SocketAddr, msg: Message) {
        log::debug!("Received {} from {}", msg.type_name(), from);

        match msg {
            Message::QueryLatest => {
                let reply = self.chain_sync.latest_response().await;
                if let Err(e) = self.peer_manager.send_to(&from, reply).await {
                    log::warn!("Failed to reply to {}: {}", from, e);
                }
            }

            Message::QueryAll => {
                let reply = self.chain_sync.chain_response().await;
                if let Err(e) = self.peer_manager.send_to(&from, reply).await {
                    log::warn!("Failed to reply to {}: {}", from, e);
                }
            }

            Message::ResponseBlockchain(blocks) => {
                self.chain_sync.handle_blockchain_response(blocks).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Block;
    use crate::network::peer::PeerHandle;

    async fn node_with_peer() -> (Node, SocketAddr, mpsc::Receiver<Message>) {
        let node = Node::new(NodeConfig::default());
        let addr: SocketAddr = "127.0.0.1:6001".parse().unwrap();
        let (tx, rx) = mpsc::channel(8);
        node.peer_manager
            .add_peer(addr, PeerHandle { addr, tx }, false)
            .await;
        (node, addr, rx)
    }

    #[tokio::test]
    async fn test_query_latest_gets_singleton_reply() {
        let (node, addr, mut rx) = node_with_peer().await;

        node.handle_message(addr, Message::QueryLatest).await;

        assert_eq!(
            rx.recv().await,
            Some(Message::ResponseBlockchain(vec![Block::genesis()]))
        );
    }

    #[tokio::test]
    async fn test_query_all_gets_full_chain() {
        let (node, addr, mut rx) = node_with_peer().await;
        {
            let mut chain = node.blockchain.write().await;
            chain.generate_next_block(vec!["a".to_string()]).unwrap();
        }

        node.handle_message(addr, Message::QueryAll).await;

        match rx.recv().await {
            Some(Message::ResponseBlockchain(blocks)) => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0], Block::genesis());
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_response_feeds_reconciliation() {
        let (node, addr, _rx) = node_with_peer().await;

        // A stale singleton response leaves the chain untouched
        node.handle_message(addr, Message::ResponseBlockchain(vec![Block::genesis()]))
            .await;
        assert_eq!(node.blockchain.read().await.height(), 0);
    }
}
