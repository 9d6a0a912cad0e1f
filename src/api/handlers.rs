//! REST API handlers for ledger operations

use crate::core::{Block, Blockchain};
use crate::network::{Node, PeerManager};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub blockchain: Arc<RwLock<Blockchain>>,
    pub peer_manager: Arc<PeerManager>,
    pub node: Arc<Node>,
}

impl ApiState {
    /// Build the API state around a node's shared components
    pub fn new(node: Arc<Node>) -> Self {
        Self {
            blockchain: node.blockchain.clone(),
            peer_manager: node.peer_manager.clone(),
            node,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ChainInfo {
    pub height: u64,
    pub total_blocks: usize,
    pub latest_hash: String,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub blocks_checked: usize,
    pub message: String,
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct PeerResponse {
    pub peer: String,
}

#[derive(Serialize, Debug)]
pub struct ApiError {
    pub error: String,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct MineRequest {
    pub data: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddPeerRequest {
    pub peer: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/chain - Get chain info
pub async fn get_chain_info(State(state): State<ApiState>) -> Json<ChainInfo> {
    let chain = state.blockchain.read().await;

    Json(ChainInfo {
        height: chain.height(),
        total_blocks: chain.blocks().len(),
        latest_hash: chain.latest_block().hash(),
    })
}

/// GET /api/chain/blocks - Get the full chain
pub async fn get_blocks(State(state): State<ApiState>) -> Json<Vec<Block>> {
    let chain = state.blockchain.read().await;
    Json(chain.blocks().to_vec())
}

/// GET /api/chain/blocks/{index} - Get a block by index
pub async fn get_block_by_index(
    State(state): State<ApiState>,
    Path(index): Path<u64>,
) -> Result<Json<Block>, (StatusCode, Json<ApiError>)> {
    let chain = state.blockchain.read().await;

    chain.get_block(index).cloned().map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: format!("Block {} not found", index),
        }),
    ))
}

/// GET /api/chain/validate - Validate the held chain
pub async fn validate_chain(State(state): State<ApiState>) -> Json<ValidationResponse> {
    let chain = state.blockchain.read().await;

    let (valid, message) = match Blockchain::is_valid_chain(chain.blocks()) {
        Ok(()) => (true, "Chain is valid".to_string()),
        Err(e) => (false, e.to_string()),
    };

    Json(ValidationResponse {
        valid,
        blocks_checked: chain.blocks().len(),
        message,
    })
}

/// POST /api/mine - Mine a new block over the given payload
pub async fn mine_block(
    State(state): State<ApiState>,
    Json(request): Json<MineRequest>,
) -> Result<Json<Block>, (StatusCode, Json<ApiError>)> {
    let block = {
        let mut chain = state.blockchain.write().await;
        chain.generate_next_block(request.data).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: e.to_string(),
                }),
            )
        })?
    };

    log::info!("Mined block {} via API", block.header.index);
    state.node.broadcast_latest().await;

    Ok(Json(block))
}

/// GET /api/version - Node version
pub async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/peers - List connected peers
pub async fn list_peers(State(state): State<ApiState>) -> Json<Vec<String>> {
    let peers = state.peer_manager.peer_addrs().await;
    Json(peers.iter().map(|p| p.to_string()).collect())
}

/// POST /api/peers - Connect to a new peer
pub async fn add_peer(
    State(state): State<ApiState>,
    Json(request): Json<AddPeerRequest>,
) -> Result<(StatusCode, Json<PeerResponse>), (StatusCode, Json<ApiError>)> {
    state.node.connect_to(&request.peer).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: e.to_string(),
            }),
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PeerResponse { peer: request.peer }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NodeConfig;

    fn test_state() -> ApiState {
        ApiState::new(Arc::new(Node::new(NodeConfig::default())))
    }

    #[tokio::test]
    async fn test_mine_then_list_blocks() {
        let state = test_state();

        let Json(mined) = mine_block(
            State(state.clone()),
            Json(MineRequest {
                data: vec!["hello".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(mined.header.index, 1);

        let Json(blocks) = get_blocks(State(state)).await;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], mined);
    }

    #[tokio::test]
    async fn test_get_block_by_index_not_found() {
        let state = test_state();
        let result = get_block_by_index(State(state), Path(42)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_validate_chain_reports_valid() {
        let state = test_state();
        let Json(response) = validate_chain(State(state)).await;
        assert!(response.valid);
        assert_eq!(response.blocks_checked, 1);
    }
}
