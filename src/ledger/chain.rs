//! The append-only ledger
//!
//! An ordered sequence of blocks plus a buffer of pending transactions.
//! Blocks are appended only through `new_block` and never mutated
//! afterwards; the pending buffer is drained exactly when a block is
//! appended. One `Ledger` value lives for the process lifetime, owned
//! by the node's service state (no ambient globals), so several
//! independent nodes can coexist in one test process.

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use crate::consensus::{Block, Transaction};
use crate::constants::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// Ledger invariant failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The chain has no blocks. Unreachable after construction; seeing
    /// it indicates a logic bug, not bad input.
    #[error("ledger chain is empty")]
    EmptyChain,
}

/// Append-only chain of blocks plus the pending-transaction buffer
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.append_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string());
        ledger
    }

    /// Buffer a transaction for the next mined block.
    ///
    /// Returns the index of the block the transaction will appear in.
    /// Amounts, signs, and balances are deliberately unvalidated; this
    /// ledger tracks no accounts.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Result<u64, LedgerError> {
        self.pending.push(Transaction::new(sender, recipient, amount));
        Ok(self.last_block()?.index + 1)
    }

    /// Seal the pending buffer into a new block and append it.
    ///
    /// `previous_hash` defaults to the digest of the current last block.
    /// The pending buffer moves into the block atomically with the
    /// append; callers serialize mutation externally.
    pub fn new_block(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<Block, LedgerError> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block()?.hash(),
        };
        Ok(self.append_block(proof, previous_hash))
    }

    fn append_block(&mut self, proof: u64, previous_hash: String) -> Block {
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: unix_now(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        self.chain.push(block.clone());
        block
    }

    /// The most recently appended block
    pub fn last_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Read-only view of the chain
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Current chain length in blocks
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Transactions awaiting inclusion in the next block
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Replace the chain wholesale after consensus resolution.
    ///
    /// The pending buffer is left untouched; buffered transactions will
    /// be committed on top of the adopted chain.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock seconds since the Unix epoch
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is set before the Unix epoch")
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_holds_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);

        let genesis = ledger.last_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert!(genesis.is_genesis());
    }

    #[test]
    fn test_new_transaction_returns_next_index() {
        let mut ledger = Ledger::new();
        let index = ledger.new_transaction("alice", "bob", 5.0).unwrap();
        assert_eq!(index, 2);
        assert_eq!(ledger.pending().len(), 1);
        // Buffering alone never extends the chain
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_new_block_drains_pending_buffer() {
        let mut ledger = Ledger::new();
        ledger.new_transaction("alice", "bob", 5.0).unwrap();
        ledger.new_transaction("bob", "carol", 2.5).unwrap();

        let block = ledger.new_block(35293, None).unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[0].sender, "alice");
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_new_block_without_transactions_is_empty() {
        let mut ledger = Ledger::new();
        ledger.new_transaction("alice", "bob", 5.0).unwrap();
        ledger.new_block(35293, None).unwrap();

        let second = ledger.new_block(35089, None).unwrap();
        assert!(second.transactions.is_empty());
    }

    #[test]
    fn test_new_block_links_to_last_digest() {
        let mut ledger = Ledger::new();
        let genesis_hash = ledger.last_block().unwrap().hash();

        let block = ledger.new_block(35293, None).unwrap();
        assert_eq!(block.previous_hash, genesis_hash);
    }

    #[test]
    fn test_explicit_previous_hash_wins() {
        let mut ledger = Ledger::new();
        let block = ledger
            .new_block(35293, Some("f".repeat(64)))
            .unwrap();
        assert_eq!(block.previous_hash, "f".repeat(64));
    }

    #[test]
    fn test_indexes_increase_by_one() {
        let mut ledger = Ledger::new();
        for _ in 0..3 {
            ledger.new_block(35293, None).unwrap();
        }
        let indexes: Vec<u64> = ledger.chain().iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_replace_chain_keeps_pending_buffer() {
        let mut ledger = Ledger::new();
        ledger.new_transaction("alice", "bob", 5.0).unwrap();

        let mut other = Ledger::new();
        other.new_block(35293, None).unwrap();
        ledger.replace_chain(other.chain().to_vec());

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.pending().len(), 1);
    }
}
