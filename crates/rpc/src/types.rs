//! Wire types shared by the method implementations.

use kestrel_common::{BlockHash, BlockHeader, BlockNumber, Transaction, TransactionReceipt};
use kestrel_crypto::Felt;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A block reference as it appears in requests: `"latest"`,
/// `{"block_number": n}` or `{"block_hash": "0x.."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Number {
        block_number: u64,
    },
    Hash {
        block_hash: Felt,
    },
    Tag(BlockTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BlockTag {
    #[serde(rename = "latest")]
    Latest,
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::Tag(BlockTag::Latest)
    }
}

impl BlockId {
    pub(crate) fn to_storage(self) -> Result<kestrel_storage::BlockId, ApplicationError> {
        match self {
            // Block numbers beyond the storage range cannot exist.
            BlockId::Number { block_number } => BlockNumber::new(block_number)
                .map(kestrel_storage::BlockId::Number)
                .ok_or(ApplicationError::BlockNotFound),
            BlockId::Hash { block_hash } => {
                Ok(kestrel_storage::BlockId::Hash(BlockHash(block_hash)))
            }
            BlockId::Tag(BlockTag::Latest) => Ok(kestrel_storage::BlockId::Latest),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockStatus {
    AcceptedOnL2,
}

#[derive(Debug, Serialize)]
pub struct BlockWithTxHashes {
    pub status: BlockStatus,
    #[serde(flatten)]
    pub header: BlockHeaderDto,
    pub transactions: Vec<Felt>,
}

#[derive(Debug, Serialize)]
pub struct BlockWithTxs {
    pub status: BlockStatus,
    #[serde(flatten)]
    pub header: BlockHeaderDto,
    pub transactions: Vec<Transaction>,
}

/// The header fields every block query replies with.
#[derive(Debug, Serialize)]
pub struct BlockHeaderDto {
    pub block_hash: Felt,
    pub parent_hash: Felt,
    pub block_number: u64,
    pub new_root: Felt,
    pub timestamp: u64,
    pub sequencer_address: Felt,
}

impl From<BlockHeader> for BlockHeaderDto {
    fn from(header: BlockHeader) -> Self {
        Self {
            block_hash: header.hash.0,
            parent_hash: header.parent_hash.0,
            block_number: header.number.get(),
            new_root: header.state_commitment,
            timestamp: header.timestamp,
            sequencer_address: header.sequencer_address,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionReceiptWithBlock {
    pub status: BlockStatus,
    pub block_hash: Felt,
    pub block_number: u64,
    #[serde(flatten)]
    pub receipt: TransactionReceipt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_id_forms() {
        let cases = [
            (r#""latest""#, BlockId::Tag(BlockTag::Latest)),
            (r#"{"block_number": 123}"#, BlockId::Number { block_number: 123 }),
            (
                r#"{"block_hash": "0xbeef"}"#,
                BlockId::Hash {
                    block_hash: kestrel_common::felt!("0xbeef"),
                },
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(serde_json::from_str::<BlockId>(input).unwrap(), expected);
        }
    }

    #[test]
    fn unrepresentable_block_number_is_not_found() {
        let id = BlockId::Number {
            block_number: u64::MAX,
        };
        assert_eq!(id.to_storage(), Err(ApplicationError::BlockNotFound));
    }
}
