use kestrel_common::ChainId;
use kestrel_storage::Storage;

/// State shared by every RPC handler.
#[derive(Clone)]
pub struct RpcContext {
    pub storage: Storage,
    pub chain_id: ChainId,
}

impl RpcContext {
    pub fn new(storage: Storage, chain_id: ChainId) -> Self {
        Self { storage, chain_id }
    }
}


#[cfg(test)]
impl RpcContext {
    pub(crate) fn for_tests() -> Self {
        test_fixtures::context()
    }
}
