//! Domain types shared across the node: chains and their identifiers, block
//! and transaction records, receipts, and the transaction-hash verification
//! rules.
#![deny(rust_2018_idioms)]

use kestrel_crypto::Felt;
use serde::{Deserialize, Serialize};

mod block;
mod macros;
mod receipt;
mod transaction;

pub use block::{
    Block, BlockHeader, DeployedContract, NonceUpdate, StateDiff, StateUpdate, StorageDiff,
    StorageEntry,
};
pub use receipt::{
    BuiltinCounters, Event, ExecutionResources, L1ToL2Message, L2ToL1Message, TransactionReceipt,
};
pub use transaction::{
    transaction_hash, verify_transactions, DeclareTransaction, DeployAccountTransaction,
    DeployTransaction, HashMismatch, InvokeTransaction, L1HandlerTransaction, Transaction,
    TransactionHashError, VerificationError,
};

/// An Ethereum address on the L1 side of a cross-layer message.
pub type EthereumAddress = primitive_types::H160;

/// The Starknet network a node follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Mainnet,
    Goerli,
    Goerli2,
    Integration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network: {0}, expected one of mainnet, goerli, goerli2, integration")]
pub struct UnknownChainError(String);

impl Chain {
    pub fn chain_id(&self) -> ChainId {
        match self {
            Chain::Mainnet => ChainId::MAINNET,
            Chain::Goerli => ChainId::GOERLI,
            Chain::Goerli2 => ChainId::GOERLI2,
            Chain::Integration => ChainId::INTEGRATION,
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Chain::Mainnet => "mainnet",
            Chain::Goerli => "goerli",
            Chain::Goerli2 => "goerli2",
            Chain::Integration => "integration",
        })
    }
}

impl std::str::FromStr for Chain {
    type Err = UnknownChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Chain::Mainnet),
            "goerli" => Ok(Chain::Goerli),
            "goerli2" => Ok(Chain::Goerli2),
            "integration" => Ok(Chain::Integration),
            other => Err(UnknownChainError(other.to_owned())),
        }
    }
}

/// The chain identifier used in transaction hashes: the felt encoding of the
/// network's ASCII name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainId(pub Felt);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(felt_bytes!(b"SN_MAIN"));
    pub const GOERLI: ChainId = ChainId(felt_bytes!(b"SN_GOERLI"));
    pub const GOERLI2: ChainId = ChainId(felt_bytes!(b"SN_GOERLI2"));
    pub const INTEGRATION: ChainId = ChainId(felt_bytes!(b"SN_INTEGRATION"));

    pub fn to_hex_str(&self) -> String {
        self.0.to_hex_str()
    }
}

/// A Starknet block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const GENESIS: BlockNumber = BlockNumber(0);

    /// Block numbers are stored in sqlite INTEGER columns, so only values
    /// that fit an i64 are representable.
    pub const fn new(number: u64) -> Option<Self> {
        if number <= i64::MAX as u64 {
            Some(BlockNumber(number))
        } else {
            None
        }
    }

    pub const fn new_or_panic(number: u64) -> Self {
        match Self::new(number) {
            Some(n) => n,
            None => panic!("block number out of range"),
        }
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<BlockNumber> for Felt {
    fn from(number: BlockNumber) -> Self {
        Felt::from(number.0)
    }
}

/// A Starknet block hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub Felt);

impl std::fmt::Display for BlockHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
