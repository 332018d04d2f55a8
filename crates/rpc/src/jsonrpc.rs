//! A JSON-RPC 2.0 server core: request parsing, method registry with
//! positional and named parameter binding, batching, and the axum transport.

mod error;
mod request;
mod response;
mod router;

pub use error::RpcError;
pub use request::RpcRequest;
pub use response::RpcResponse;
pub use router::{rpc_handler, IntoMethod, MethodEndpoint, Param, RpcRouter, RpcRouterBuilder};

/// The `id` member of a request.
///
/// `Notification` marks an absent id, which per the specification means no
/// response may be produced. A literal `null` id is accepted and echoed.
#[derive(Debug, PartialEq, Clone)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
    Notification,
}

impl RequestId {
    pub fn is_notification(&self) -> bool {
        self == &RequestId::Notification
    }
}
