//! Block structure for the Tally ledger
//!
//! Defines the immutable transaction and block records. A block never
//! stores its own digest; it is recomputed from the canonical
//! serialization whenever linkage needs to be checked.

use serde::{Deserialize, Serialize};
use crate::crypto::canonical_digest;

/// A transfer record buffered for inclusion in the next block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Originating account label
    pub sender: String,
    /// Receiving account label
    pub recipient: String,
    /// Transferred amount (unvalidated; the ledger tracks no balances)
    pub amount: f64,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}

/// One unit of the ledger: committed transactions plus linkage and proof
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain
    pub index: u64,
    /// Wall-clock seconds since the Unix epoch at sealing time
    pub timestamp: f64,
    /// Transactions committed by this block, in buffer order
    pub transactions: Vec<Transaction>,
    /// Proof-of-work integer sealing this block
    pub proof: u64,
    /// Digest of the preceding block ("1" for genesis)
    pub previous_hash: String,
}

impl Block {
    /// Compute this block's digest from its canonical serialization
    pub fn hash(&self) -> String {
        canonical_digest(self)
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == crate::constants::GENESIS_PREVIOUS_HASH
    }
}
