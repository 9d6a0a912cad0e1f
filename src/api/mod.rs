//! REST API module
//!
//! Provides the HTTP shell over the ledger core.
//!
//! # Endpoints
//!
//! ## Chain
//! - `GET /api/chain` - Chain info
//! - `GET /api/chain/blocks` - Full chain
//! - `GET /api/chain/blocks/:index` - Get block by index
//! - `GET /api/chain/validate` - Validate the held chain
//!
//! ## Mining
//! - `POST /api/mine` - Mine a new block over an opaque payload
//!
//! ## Node
//! - `GET /api/version` - Node version
//! - `GET /api/peers` - List connected peers
//! - `POST /api/peers` - Connect to a peer

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
