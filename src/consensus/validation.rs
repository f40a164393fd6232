//! Candidate-chain validation
//!
//! Pure functions that judge an arbitrary chain's internal consistency
//! (linkage and proof-of-work) without consulting any local ledger.

use thiserror::Error;
use super::block::Block;
use super::proof::valid_proof;

/// Why a candidate chain was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainValidationError {
    #[error("candidate chain is empty")]
    EmptyChain,
    #[error("block {index} does not link to the digest of its predecessor")]
    BrokenLinkage { index: u64 },
    #[error("block {index} carries an invalid proof of work")]
    InvalidProof { index: u64 },
}

/// Validate a candidate chain, stopping at the first violation.
///
/// Walks adjacent pairs from the second block onward, checking that each
/// block links to its predecessor's digest and that the proof pair
/// satisfies the proof-of-work predicate. A genesis-only chain is
/// trivially valid. Never repairs or truncates.
pub fn validate_chain(chain: &[Block]) -> Result<(), ChainValidationError> {
    let mut last = chain.first().ok_or(ChainValidationError::EmptyChain)?;

    for block in &chain[1..] {
        if block.previous_hash != last.hash() {
            return Err(ChainValidationError::BrokenLinkage { index: block.index });
        }
        if !valid_proof(last.proof, block.proof) {
            return Err(ChainValidationError::InvalidProof { index: block.index });
        }
        last = block;
    }

    Ok(())
}

/// Boolean view of [`validate_chain`], used by the consensus resolver
pub fn is_valid_chain(chain: &[Block]) -> bool {
    validate_chain(chain).is_ok()
}
