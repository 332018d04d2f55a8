use kestrel_common::StateUpdate;

use crate::context::RpcContext;
use crate::error::ApplicationError;
use crate::jsonrpc::RpcError;
use crate::types::BlockId;

pub async fn get_state_update(
    context: RpcContext,
    block_id: BlockId,
) -> Result<StateUpdate, RpcError> {
    let update = context
        .storage
        .state_update(block_id.to_storage()?)?
        .ok_or(ApplicationError::BlockNotFound)?;
    Ok(update)
}
