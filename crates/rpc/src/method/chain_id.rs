use crate::context::RpcContext;
use crate::jsonrpc::RpcError;

pub async fn chain_id(context: RpcContext) -> Result<String, RpcError> {
    Ok(context.chain_id.to_hex_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_hex_encoded_network_name() {
        let context = RpcContext::for_tests();
        // b"SN_GOERLI"
        assert_eq!(chain_id(context).await.unwrap(), "0x534e5f474f45524c49");
    }
}
