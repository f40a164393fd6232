//! Tally Ledger Node
//!
//! Main entry point for running a Tally node.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tally_core::api::{serve, AppState};
use tally_core::constants::DEFAULT_PORT;

#[derive(Debug, Parser)]
#[command(name = "tally-node", about = "Run a Tally ledger node")]
struct Args {
    /// Port to listen to
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(AppState::new());

    {
        let ledger = state.ledger.read().await;
        let genesis = ledger.last_block()?;
        info!(
            "genesis block sealed: index {} proof {} hash {}",
            genesis.index,
            genesis.proof,
            genesis.hash()
        );
    }
    info!("node identifier: {}", state.node_id);

    serve(state, args.port).await?;

    Ok(())
}
