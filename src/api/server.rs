//! HTTP server
//!
//! Axum router over the five node operations, with the CORS layer open
//! for browser-driven tooling.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::mining::Miner;
use super::routes::{self, AppState};

/// Build the node's router with shared state applied
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/transactions/new", post(routes::new_transaction))
        .route("/mine", get(routes::mine))
        .route("/chain", get(routes::full_chain))
        .route("/nodes/register", post(routes::register_nodes))
        .route("/nodes/resolve", get(routes::resolve_conflicts))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c.
///
/// The shutdown path trips the miner stop signal first so an in-flight
/// nonce search cannot outlive the server.
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("node listening on http://{addr}");

    let miner = state.miner.clone();
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal(miner))
        .await
}

async fn shutdown_signal(miner: Miner) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received, stopping node");
    miner.stop();
}
