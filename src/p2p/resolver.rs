//! Longest-chain conflict resolution
//!
//! Polls every registered peer for its full chain and adopts the
//! longest candidate that validates, replacing the local chain
//! wholesale. Per-peer failures only skip that peer; resolution never
//! aborts because one neighbour is down.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::consensus::{is_valid_chain, Block};
use crate::constants::PEER_TIMEOUT;
use crate::ledger::Ledger;

/// The `/chain` wire shape exchanged between nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: u64,
}

/// Why a single peer was skipped during resolution
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer {location} is unreachable: {source}")]
    Unreachable {
        location: String,
        source: reqwest::Error,
    },
    #[error("peer {location} returned an invalid response: {reason}")]
    Protocol { location: String, reason: String },
}

/// Peer poller and chain-replacement orchestrator
#[derive(Debug, Clone)]
pub struct ConsensusResolver {
    client: reqwest::Client,
}

impl ConsensusResolver {
    /// Create a resolver with the fixed per-request peer deadline
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(PEER_TIMEOUT)
            .build()
            .expect("static client configuration is valid");
        Self { client }
    }

    /// Fetch one peer's full chain and reported length
    async fn fetch_chain(&self, location: &str) -> Result<ChainSnapshot, PeerError> {
        let url = format!("http://{location}/chain");

        let response = self.client.get(&url).send().await.map_err(|source| {
            PeerError::Unreachable {
                location: location.to_string(),
                source,
            }
        })?;

        if !response.status().is_success() {
            return Err(PeerError::Protocol {
                location: location.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|err| PeerError::Protocol {
                location: location.to_string(),
                reason: err.to_string(),
            })
    }

    /// Run the longest-valid-chain rule against all registered peers.
    ///
    /// Peers are queried concurrently, each bounded by the client
    /// timeout, so one stalled neighbour cannot serialize resolution.
    /// A candidate wins iff its reported length strictly exceeds the
    /// running maximum AND the chain validates on its own. Returns true
    /// when the local chain was replaced.
    ///
    /// Known limitation, kept deliberately: candidates compete on
    /// reported length, not accumulated work, so a longer low-effort
    /// chain can displace a shorter harder one.
    pub async fn resolve_conflicts(
        &self,
        ledger: &Arc<RwLock<Ledger>>,
        peers: Vec<String>,
    ) -> bool {
        let mut max_length = ledger.read().await.len() as u64;
        let mut candidate: Option<Vec<Block>> = None;

        let fetches: Vec<_> = peers
            .into_iter()
            .map(|location| {
                let resolver = self.clone();
                tokio::spawn(async move {
                    let result = resolver.fetch_chain(&location).await;
                    (location, result)
                })
            })
            .collect();

        for handle in fetches {
            let (location, result) = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!("peer poll task failed: {err}");
                    continue;
                }
            };

            match result {
                Ok(snapshot) => {
                    if snapshot.length <= max_length {
                        debug!(
                            "peer {location} reports length {}, not above {max_length}",
                            snapshot.length
                        );
                    } else if !is_valid_chain(&snapshot.chain) {
                        debug!("peer {location} sent an invalid chain, rejected");
                    } else {
                        max_length = snapshot.length;
                        candidate = Some(snapshot.chain);
                    }
                }
                Err(err) => warn!("skipping peer: {err}"),
            }
        }

        match candidate {
            Some(chain) => {
                ledger.write().await.replace_chain(chain);
                info!("local chain replaced by a longer peer chain ({max_length} blocks)");
                true
            }
            None => false,
        }
    }
}

impl Default for ConsensusResolver {
    fn default() -> Self {
        Self::new()
    }
}
