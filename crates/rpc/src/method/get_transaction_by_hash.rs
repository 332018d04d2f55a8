use kestrel_common::Transaction;
use kestrel_crypto::Felt;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;

pub async fn get_transaction_by_hash(
    context: RpcContext,
    transaction_hash: Felt,
) -> Result<Transaction, RpcError> {
    let transaction = context
        .storage
        .transaction_by_hash(transaction_hash)?
        .ok_or(ApplicationError::TxnHashNotFound)?;
    Ok(transaction)
}
