use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::{BlockId, BlockStatus, BlockWithTxs};

pub async fn get_block_with_txs(
    context: RpcContext,
    block_id: BlockId,
) -> Result<BlockWithTxs, RpcError> {
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
        .unwrap_or_default();

    Ok(BlockWithTxs {
        status: BlockStatus::AcceptedOnL2,
        header: header.into(),
        transactions,
    })
}
