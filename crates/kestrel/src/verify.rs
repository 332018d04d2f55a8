//! Verification of blocks delivered by the upstream source.
//!
//! A block is accepted once every recomputable transaction hash matches its
//! declared value and both header commitments are reproduced from the block
//! payload.

use kestrel_common::{verify_transactions, Block, ChainId, VerificationError};
use kestrel_crypto::Felt;
use kestrel_merkle_tree::{event_commitment, transaction_commitment};

#[derive(Debug, thiserror::Error)]
pub enum BlockVerificationError {
    #[error(transparent)]
    TransactionHashes(#[from] VerificationError),
    #[error("transaction commitment mismatch: header has {declared}, computed {computed}")]
    TransactionCommitmentMismatch { declared: Felt, computed: Felt },
    #[error("event commitment mismatch: header has {declared}, computed {computed}")]
    EventCommitmentMismatch { declared: Felt, computed: Felt },
    #[error(transparent)]
    Commitment(#[from] anyhow::Error),
}

/// Checks everything this node recomputes about a block: the per-transaction
/// hash recipes and the transaction and event commitments in the header.
pub fn verify_block(block: &Block, chain: ChainId) -> Result<(), BlockVerificationError> {
    verify_transactions(&block.transactions, chain)?;

    let computed = transaction_commitment(&block.transactions)?;
    if computed != block.header.transaction_commitment {
        return Err(BlockVerificationError::TransactionCommitmentMismatch {
            declared: block.header.transaction_commitment,
            computed,
        });
    }

    let computed = event_commitment(&block.receipts)?;
    if computed != block.header.event_commitment {
        return Err(BlockVerificationError::EventCommitmentMismatch {
            declared: block.header.event_commitment,
            computed,
        });
    }

    Ok(())
}
