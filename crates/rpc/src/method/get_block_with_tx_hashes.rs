use kestrel_common::Transaction;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::{BlockId, BlockStatus, BlockWithTxHashes};

pub async fn get_block_with_tx_hashes(
    context: RpcContext,
    block_id: BlockId,
) -> Result<BlockWithTxHashes, RpcError> {
    // Pin the reference down to a number so the header and transaction
    // queries cannot disagree about what "latest" is.
    let number = context
        .storage
        .block_number(block_id.to_storage()?)?
        .ok_or(ApplicationError::BlockNotFound)?;
    let block_id = kestrel_storage::BlockId::Number(number);

    let header = context
        .storage
        .block_header(block_id)?
        .ok_or(ApplicationError::BlockNotFound)?;
    let transactions = context
        .storage
        .block_transactions(block_id)?
        .unwrap_or_default()
        .iter()
        .map(Transaction::hash)
        .collect();

    Ok(BlockWithTxHashes {
        status: BlockStatus::AcceptedOnL2,
        header: header.into(),
        transactions,
    })
}
