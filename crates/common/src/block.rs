use kestrel_crypto::Felt;
use serde::{Deserialize, Serialize};

use crate::{BlockHash, BlockNumber, Transaction, TransactionReceipt};

/// The verified header of a canonical block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub number: BlockNumber,
    pub timestamp: u64,
    pub sequencer_address: Felt,
    /// The global state commitment after this block.
    pub state_commitment: Felt,
    pub transaction_commitment: Felt,
    pub event_commitment: Felt,
    pub gas_price: u128,
}

/// A block as delivered by the upstream source: header plus the transactions
/// and their receipts, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<TransactionReceipt>,
}

/// The state difference a block applied, keyed by the block it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub block_hash: BlockHash,
    pub new_root: Felt,
    pub old_root: Felt,
    pub state_diff: StateDiff,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    pub storage_diffs: Vec<StorageDiff>,
    pub declared_contract_hashes: Vec<Felt>,
    pub deployed_contracts: Vec<DeployedContract>,
    pub nonces: Vec<NonceUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDiff {
    pub address: Felt,
    pub storage_entries: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub key: Felt,
    pub value: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub address: Felt,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceUpdate {
    pub contract_address: Felt,
    pub nonce: Felt,
}
