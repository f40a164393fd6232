//! Route handlers
//!
//! Each endpoint maps to exactly one ledger or resolver operation and
//! hands back plain data for axum to encode. Handlers never hold a
//! lock across the nonce search; only the append takes the write lock.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::consensus::{Block, Transaction};
use crate::constants::{REWARD_AMOUNT, REWARD_SENDER};
use crate::ledger::{Ledger, LedgerError};
use crate::mining::{Miner, MiningResult};
use crate::p2p::{AddressError, ChainSnapshot, ConsensusResolver, NodeRegistry};

/// Shared node state injected into every handler.
///
/// Owned explicitly rather than living in a static so several
/// independent nodes can coexist in one process.
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub registry: Arc<RwLock<NodeRegistry>>,
    pub resolver: ConsensusResolver,
    pub miner: Miner,
    /// Per-process identity, credited by the mining reward transaction
    pub node_id: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(RwLock::new(Ledger::new())),
            registry: Arc::new(RwLock::new(NodeRegistry::new())),
            resolver: ConsensusResolver::new(),
            miner: Miner::new(),
            node_id: Uuid::new_v4().simple().to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing values: {0}")]
    MalformedRequest(#[from] JsonRejection),
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    #[error("mining was interrupted before a proof was found")]
    MiningInterrupted,
    #[error(transparent)]
    Internal(#[from] LedgerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MalformedRequest(_) | ApiError::InvalidAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MiningInterrupted => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(MessageResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Replaced {
        message: String,
        new_chain: Vec<Block>,
    },
    Authoritative {
        message: String,
        chain: Vec<Block>,
    },
}

/// POST /transactions/new
pub async fn new_transaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload?;

    let index = state
        .ledger
        .write()
        .await
        .new_transaction(request.sender, request.recipient, request.amount)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transactions will be added to Block {index}"),
        }),
    ))
}

/// GET /mine
pub async fn mine(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MineResponse>, ApiError> {
    let last_proof = state.ledger.read().await.last_block()?.proof;

    // CPU-bound search runs off the async runtime, without the lock
    let miner = state.miner.clone();
    let result = tokio::task::spawn_blocking(move || miner.find_proof(last_proof))
        .await
        .map_err(|_| ApiError::MiningInterrupted)?;

    let proof = match result {
        MiningResult::Success(proof) => proof,
        MiningResult::Interrupted => return Err(ApiError::MiningInterrupted),
    };

    // Reward transaction and append under one lock acquisition so no
    // other mutation interleaves between them
    let block = {
        let mut ledger = state.ledger.write().await;
        ledger.new_transaction(REWARD_SENDER, state.node_id.clone(), REWARD_AMOUNT)?;
        ledger.new_block(proof, None)?
    };

    info!("block {} forged with proof {}", block.index, block.proof);

    Ok(Json(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

/// GET /chain
pub async fn full_chain(State(state): State<Arc<AppState>>) -> Json<ChainSnapshot> {
    let ledger = state.ledger.read().await;
    Json(ChainSnapshot {
        chain: ledger.chain().to_vec(),
        length: ledger.len() as u64,
    })
}

/// POST /nodes/register
pub async fn register_nodes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterNodesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterNodesResponse>), ApiError> {
    let Json(request) = payload?;

    let mut registry = state.registry.write().await;
    for address in &request.nodes {
        registry.register(address)?;
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes: registry.peers(),
        }),
    ))
}

/// GET /nodes/resolve
pub async fn resolve_conflicts(
    State(state): State<Arc<AppState>>,
) -> Json<ResolveResponse> {
    let peers = state.registry.read().await.peers();
    let replaced = state.resolver.resolve_conflicts(&state.ledger, peers).await;

    let chain = state.ledger.read().await.chain().to_vec();
    let response = if replaced {
        ResolveResponse::Replaced {
            message: "Our chain was replaced".to_string(),
            new_chain: chain,
        }
    } else {
        ResolveResponse::Authoritative {
            message: "Our chain is authoritative".to_string(),
            chain,
        }
    };

    Json(response)
}
