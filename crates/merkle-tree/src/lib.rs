//! The binary Merkle-Patricia tree Starknet uses as a vector commitment, and
//! the block-level transaction and event commitments built on it.
//!
//! Unlike the global state trees, the commitment trees here are transient:
//! a tree is populated from one block's payload, its root extracted, and the
//! whole structure dropped. Nothing is persisted.
#![deny(rust_2018_idioms)]

mod merkle_node;
mod transaction;
mod tree;

pub use transaction::{event_commitment, transaction_commitment, EventTree, TransactionTree};
pub use tree::{KeyOutOfRangeError, MerkleTree};

use kestrel_crypto::{pedersen_hash, Felt};

/// The hash function applied at the nodes of a [MerkleTree].
pub trait FeltHash {
    fn hash(a: Felt, b: Felt) -> Felt;
}

/// [FeltHash] instance for the Pedersen hash.
#[derive(Debug, Clone, Copy)]
pub struct PedersenHash;

impl FeltHash for PedersenHash {
    fn hash(a: Felt, b: Felt) -> Felt {
        pedersen_hash(a, b)
    }
}
