use kestrel_common::Transaction;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::BlockId;

pub async fn get_transaction_by_block_id_and_index(
    context: RpcContext,
    block_id: BlockId,
    index: u64,
) -> Result<Transaction, RpcError> {
    // Distinguish "no such block" from "no such index".
    let number = context
        .storage
        .block_number(block_id.to_storage()?)?
        .ok_or(ApplicationError::BlockNotFound)?;

    let transaction = context
        .storage
        .transaction_at_index(kestrel_storage::BlockId::Number(number), index)?
        .ok_or(ApplicationError::InvalidTxnIndex)?;
    Ok(transaction)
}
