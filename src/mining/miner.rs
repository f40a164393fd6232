//! Proof-of-work search
//!
//! The nonce search is the only unbounded-latency operation in the
//! node, so it carries an explicit stop signal. The search touches no
//! shared state; callers append the sealed block under their own lock
//! after a proof is found.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use crate::consensus::valid_proof;

/// Outcome of a proof search
#[derive(Debug, PartialEq, Eq)]
pub enum MiningResult {
    /// Found the smallest satisfying proof
    Success(u64),
    /// The stop signal tripped before a proof was found
    Interrupted,
}

/// Proof-of-work searcher with a shared stop signal
#[derive(Debug, Clone, Default)]
pub struct Miner {
    stop_signal: Arc<AtomicBool>,
}

impl Miner {
    /// Create a new miner
    pub fn new() -> Self {
        Self {
            stop_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a stop signal handle
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }

    /// Stop any in-flight search
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Clear the stop signal
    pub fn reset(&self) {
        self.stop_signal.store(false, Ordering::SeqCst);
    }

    /// Find the smallest proof sealing against `last_proof`.
    ///
    /// Candidates are tested in increasing order from 0, so a `Success`
    /// result is the minimal satisfying integer. CPU-bound; run on a
    /// blocking thread when called from async context.
    pub fn find_proof(&self, last_proof: u64) -> MiningResult {
        let mut proof = 0u64;
        loop {
            if self.stop_signal.load(Ordering::SeqCst) {
                return MiningResult::Interrupted;
            }
            if valid_proof(last_proof, proof) {
                return MiningResult::Success(proof);
            }
            proof += 1;
        }
    }
}
