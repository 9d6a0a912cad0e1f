//! Peer registry and broadcast fan-out
//!
//! Tracks the handle of every live peer connection and routes outbound
//! messages onto each connection's writer queue.

use crate::network::message::{Message, MessageError};
use std::collections::HashMap;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

/// Peer connection errors
#[derive(Error, Debug)]
pub enum PeerError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] MessageError),
    #[error("peer disconnected")]
    Disconnected,
}

/// Handle for queueing messages onto one peer's writer task
#[derive(Clone)]
pub struct PeerHandle {
    pub addr: SocketAddr,
    pub tx: mpsc::Sender<Message>,
}

impl PeerHandle {
    pub async fn send(&self, msg: Message) -> Result<(), PeerError> {
        self.tx.send(msg).await.map_err(|_| PeerError::Disconnected)
    }
}

/// Manages all live peer connections
pub struct PeerManager {
    handles: RwLock<HashMap<SocketAddr, PeerHandle>>,
}

impl PeerManager {
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new peer connection
    pub async fn add_peer(&self, addr: SocketAddr, handle: PeerHandle, outbound: bool) {
        let mut handles = self.handles.write().await;
        handles.insert(addr, handle);
        log::info!("Added peer: {} (outbound: {})", addr, outbound);
    }

    /// Remove a peer after its connection closed or failed
    pub async fn remove_peer(&self, addr: &SocketAddr) {
        let mut handles = self.handles.write().await;
        if handles.remove(addr).is_some() {
            log::info!("Removed peer: {}", addr);
        }
    }

    /// Get all connected peer addresses
    pub async fn peer_addrs(&self) -> Vec<SocketAddr> {
        let handles = self.handles.read().await;
        handles.keys().cloned().collect()
    }

    /// Get peer count
    pub async fn peer_count(&self) -> usize {
        let handles = self.handles.read().await;
        handles.len()
    }

    /// Broadcast a message to all peers.
    ///
    /// Delivery is best-effort and unordered across peers: a failed send is
    /// logged and the dead connection is cleaned up by its own task.
    pub async fn broadcast(&self, msg: Message) {
        let handles = self.handles.read().await;
        for (addr, handle) in handles.iter() {
            if let Err(e) = handle.send(msg.clone()).await {
                log::warn!("Failed to send to {}: {}", addr, e);
            }
        }
    }

    /// Send a message to a specific peer
    pub async fn send_to(&self, addr: &SocketAddr, msg: Message) -> Result<(), PeerError> {
        let handles = self.handles.read().await;
        if let Some(handle) = handles.get(addr) {
            handle.send(msg).await
        } else {
            Err(PeerError::Disconnected)
        }
    }
}

impl Default for PeerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle_for(addr: SocketAddr) -> (PeerHandle, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        (PeerHandle { addr, tx }, rx)
    }

    #[tokio::test]
    async fn test_add_and_remove_peer() {
        let manager = PeerManager::new();
        let addr: SocketAddr = "127.0.0.1:6001".parse().unwrap();
        let (handle, _rx) = handle_for(addr);

        manager.add_peer(addr, handle, true).await;
        assert_eq!(manager.peer_count().await, 1);
        assert_eq!(manager.peer_addrs().await, vec![addr]);

        manager.remove_peer(&addr).await;
        assert_eq!(manager.peer_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_peer() {
        let manager = PeerManager::new();
        let addr_a: SocketAddr = "127.0.0.1:6001".parse().unwrap();
        let addr_b: SocketAddr = "127.0.0.1:6002".parse().unwrap();
        let (handle_a, mut rx_a) = handle_for(addr_a);
        let (handle_b, mut rx_b) = handle_for(addr_b);
        manager.add_peer(addr_a, handle_a, false).await;
        manager.add_peer(addr_b, handle_b, true).await;

        manager.broadcast(Message::QueryAll).await;

        assert_eq!(rx_a.recv().await, Some(Message::QueryAll));
        assert_eq!(rx_b.recv().await, Some(Message::QueryAll));
    }

    #[tokio::test]
    async fn test_send_to_unknown_peer_fails() {
        let manager = PeerManager::new();
        let addr: SocketAddr = "127.0.0.1:6001".parse().unwrap();
        assert!(manager.send_to(&addr, Message::QueryLatest).await.is_err());
    }
}
