//! Tally Ledger Core Library
//!
//! A replicated append-only transaction ledger with PoW block sealing
//! and longest-valid-chain reconciliation between peers.
//!
//! Each node keeps the entire ledger in process memory and exposes it
//! over a small HTTP API; divergent histories converge because every
//! node unilaterally adopts the longest valid chain it can observe.

pub mod api;
pub mod consensus;
pub mod crypto;
pub mod ledger;
pub mod mining;
pub mod p2p;

/// Protocol constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    use std::time::Duration;

    /// Proof recorded in the genesis block
    pub const GENESIS_PROOF: u64 = 100;

    /// Sentinel previous-hash of the genesis block
    pub const GENESIS_PREVIOUS_HASH: &str = "1";

    /// Required hex prefix of a valid proof digest (difficulty is fixed)
    pub const DIFFICULTY_PREFIX: &str = "0000";

    /// Sender recorded on the mining reward transaction
    pub const REWARD_SENDER: &str = "0";

    /// Amount granted to the miner per sealed block
    pub const REWARD_AMOUNT: f64 = 1.0;

    /// Default HTTP listen port
    pub const DEFAULT_PORT: u16 = 5000;

    /// Per-request deadline when polling a peer for its chain
    pub const PEER_TIMEOUT: Duration = Duration::from_secs(5);
}
