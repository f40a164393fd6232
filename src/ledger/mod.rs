//! Ledger module - Append-only chain and pending-transaction buffer

mod chain;

pub use chain::*;
