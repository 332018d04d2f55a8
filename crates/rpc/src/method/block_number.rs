use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;

pub async fn block_number(context: RpcContext) -> Result<u64, RpcError> {
    let number = context
        .storage
        .latest_block_number()?
        .ok_or(ApplicationError::BlockNotFound)?;
    Ok(number.get())
}
