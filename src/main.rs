//! Hashchain node CLI
//!
//! Starts the P2P node and the REST API server over one shared chain.

use clap::Parser;
use hashchain::api::{create_router, ApiState};
use hashchain::core::Blockchain;
use hashchain::network::{Node, NodeConfig, PeerManager};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Parser)]
#[command(name = "hashchain")]
#[command(version)]
#[command(about = "A distributed append-only ledger of opaque data blocks", long_about = None)]
struct Cli {
    /// Port for the REST API
    #[arg(long, env = "HTTP_PORT", default_value = "3001")]
    http_port: u16,

    /// Port for peer connections
    #[arg(long, env = "P2P_PORT", default_value = "6001")]
    p2p_port: u16,

    /// Initial peers to connect to (comma-separated host:port)
    #[arg(long, env = "PEERS", value_delimiter = ',')]
    peers: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let blockchain = Arc::new(RwLock::new(Blockchain::new()));
        let peer_manager = Arc::new(PeerManager::new());

        let config = NodeConfig {
            port: cli.p2p_port,
            bootstrap_peers: cli.peers.clone(),
        };

        let node = Arc::new(Node::with_shared(
            config,
            blockchain.clone(),
            peer_manager.clone(),
        ));

        println!("🌐 Starting P2P node on port {}...", cli.p2p_port);
        if !cli.peers.is_empty() {
            println!("   Connecting to peers: {:?}", cli.peers);
        }

        let p2p_node = node.clone();
        tokio::spawn(async move {
            if let Err(e) = p2p_node.start().await {
                log::error!("P2P node error: {}", e);
            }
        });

        let state = ApiState::new(node);
        let app = create_router(state);

        let addr = format!("0.0.0.0:{}", cli.http_port);
        println!("🚀 REST API server starting on http://localhost:{}", cli.http_port);
        println!();
        println!("📖 Available endpoints:");
        println!("   GET  /health                    - Health check");
        println!("   GET  /api/chain                 - Chain info");
        println!("   GET  /api/chain/blocks          - Full chain");
        println!("   GET  /api/chain/blocks/{{index}}  - Get block");
        println!("   GET  /api/chain/validate        - Validate chain");
        println!("   POST /api/mine                  - Mine block");
        println!("   GET  /api/version               - Node version");
        println!("   GET  /api/peers                 - List peers");
        println!("   POST /api/peers                 - Connect to peer");
        println!();

        // Handle Ctrl+C
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!("\n📴 Shutting down node...");
            std::process::exit(0);
        });

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
