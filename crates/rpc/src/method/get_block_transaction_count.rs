use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::BlockId;

pub async fn get_block_transaction_count(
    context: RpcContext,
    block_id: BlockId,
) -> Result<u64, RpcError> {
    let count = context
        .storage
        .transaction_count(block_id.to_storage()?)?
        .ok_or(ApplicationError::BlockNotFound)?;
    Ok(count as u64)
}
