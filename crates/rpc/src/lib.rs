//! The node's JSON-RPC server: a JSON-RPC 2.0 dispatch core in [jsonrpc]
//! and the `starknet_*` method implementations in [method].
#![deny(rust_2018_idioms)]

mod context;
mod error;
pub mod jsonrpc;
pub mod method;
pub mod types;

use std::net::SocketAddr;

use anyhow::Context;
pub use context::RpcContext;
pub use error::ApplicationError;
use jsonrpc::{rpc_handler, Param, RpcRouter};

/// The largest request body the server reads.
const REQUEST_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builds the method registry this node serves.
pub fn register_methods(context: RpcContext) -> RpcRouter {
    RpcRouter::builder()
        .register("starknet_chainId", vec![], method::chain_id)
        .register("starknet_blockNumber", vec![], method::block_number)
        .register(
            "starknet_blockHashAndNumber",
            vec![],
            method::block_hash_and_number,
        )
        .register(
            "starknet_getBlockWithTxHashes",
            vec![Param::required("block_id")],
            method::get_block_with_tx_hashes,
        )
        .register(
            "starknet_getBlockWithTxs",
            vec![Param::required("block_id")],
            method::get_block_with_txs,
        )
        .register(
            "starknet_getTransactionByHash",
            vec![Param::required("transaction_hash")],
            method::get_transaction_by_hash,
        )
        .register(
            "starknet_getTransactionReceipt",
            vec![Param::required("transaction_hash")],
            method::get_transaction_receipt,
        )
        .register(
            "starknet_getBlockTransactionCount",
            vec![Param::required("block_id")],
            method::get_block_transaction_count,
        )
        .register(
            "starknet_getTransactionByBlockIdAndIndex",
            vec![Param::required("block_id"), Param::required("index")],
            method::get_transaction_by_block_id_and_index,
        )
        .register(
            "starknet_getStateUpdate",
            vec![Param::required("block_id")],
            method::get_state_update,
        )
        .build(context)
}

/// Binds the RPC server and serves it on a background task. Returns the task
/// handle and the actually bound address.
pub async fn serve(
    router: RpcRouter,
    addr: SocketAddr,
) -> anyhow::Result<(tokio::task::JoinHandle<std::io::Result<()>>, SocketAddr)> {
    let app = axum::Router::new()
        .route("/", axum::routing::post(rpc_handler))
        .layer(axum::extract::DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(router);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Binding RPC server address")?;
    let addr = listener.local_addr().context("Fetching local address")?;

    let handle = tokio::spawn(async move { axum::serve(listener, app.into_make_service()).await });

    Ok((handle, addr))
}
