use kestrel_crypto::Felt;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::{BlockStatus, TransactionReceiptWithBlock};

pub async fn get_transaction_receipt(
    context: RpcContext,
    transaction_hash: Felt,
) -> Result<TransactionReceiptWithBlock, RpcError> {
    let (receipt, block_number, block_hash) = context
        .storage
        .receipt_by_hash(transaction_hash)?
        .ok_or(ApplicationError::TxnHashNotFound)?;

    Ok(TransactionReceiptWithBlock {
        status: BlockStatus::AcceptedOnL2,
        block_hash: block_hash.0,
        block_number: block_number.get(),
        receipt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_fixtures;

    #[tokio::test]
    async fn receipt_carries_block_position() {
        let context = RpcContext::for_tests();
        let receipt = get_transaction_receipt(context, test_fixtures::TX0_HASH)
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 0);
        assert_eq!(receipt.block_hash, test_fixtures::BLOCK0_HASH);
        assert_eq!(receipt.receipt.events.len(), 1);

        let json = serde_json::to_value(&receipt).unwrap();
        // The flattened receipt sits beside the block position.
        assert_eq!(json["transaction_hash"], "0x111");
        assert_eq!(json["status"], "ACCEPTED_ON_L2");
    }

    #[tokio::test]
    async fn not_found() {
        let context = RpcContext::for_tests();
        let error = get_transaction_receipt(context, kestrel_common::felt!("0x404"))
            .await
            .unwrap_err();
        assert_eq!(error, ApplicationError::TxnHashNotFound.into());
    }
}
