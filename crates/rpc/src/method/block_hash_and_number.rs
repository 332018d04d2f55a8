use kestrel_crypto::Felt;
use serde::Serialize;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;

#[derive(Debug, Serialize)]
pub struct Output {
    pub block_hash: Felt,
    pub block_number: u64,
}

pub async fn block_hash_and_number(context: RpcContext) -> Result<Output, RpcError> {
    let header = context
        .storage
        .block_header(kestrel_storage::BlockId::Latest)?
        .ok_or(ApplicationError::BlockNotFound)?;
    Ok(Output {
        block_hash: header.hash.0,
        block_number: header.number.get(),
    })
}
