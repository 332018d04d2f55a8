use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::context::RpcContext;
use crate::jsonrpc::error::RpcError;
use crate::jsonrpc::request::{RequestParseError, RpcRequest};
use crate::jsonrpc::response::RpcResponse;
use crate::jsonrpc::RequestId;

/// A named method parameter, as configured at registration.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub optional: bool,
}

impl Param {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optional: true,
        }
    }
}

type MethodFuture = Pin<Box<dyn Future<Output = Result<Value, RpcError>> + Send>>;

/// The type-erased form a registered handler is stored in. Arguments arrive
/// positionally; `None` marks an omitted optional parameter.
pub trait MethodEndpoint: Send + Sync {
    fn invoke(&self, context: RpcContext, args: Vec<Option<Value>>) -> MethodFuture;
}

struct MethodDef {
    params: Vec<Param>,
    endpoint: Box<dyn MethodEndpoint>,
}

#[derive(Clone)]
pub struct RpcRouter {
    pub context: RpcContext,
    methods: &'static HashMap<&'static str, MethodDef>,
}

pub struct RpcRouterBuilder {
    methods: HashMap<&'static str, MethodDef>,
}

impl RpcRouterBuilder {
    /// Registers a method.
    ///
    /// The handler's arity (beyond the context argument) must match the
    /// parameter list, and each method name may only be registered once;
    /// violations of either are startup bugs and panic.
    pub fn register<I, M: IntoMethod<I>>(
        mut self,
        method_name: &'static str,
        params: Vec<Param>,
        method: M,
    ) -> Self {
        assert_eq!(
            M::arity(),
            params.len(),
            "'{method_name}' handler arity and configured parameter count must match",
        );
        let method = MethodDef {
            params,
            endpoint: method.into_endpoint(),
        };
        if self.methods.insert(method_name, method).is_some() {
            panic!("'{method_name}' is already registered");
        }
        self
    }

    pub fn build(self, context: RpcContext) -> RpcRouter {
        // Leak the registry for a static lifetime; it is write-once and
        // lives as long as the server.
        let methods = Box::leak(Box::new(self.methods));
        RpcRouter { context, methods }
    }
}

impl RpcRouter {
    pub fn builder() -> RpcRouterBuilder {
        RpcRouterBuilder {
            methods: Default::default(),
        }
    }

    /// Processes one request body, single or batch. `Ok(None)` means no
    /// bytes are to be written (notifications only). The only error is a
    /// response that cannot be serialized, which fails the whole body.
    pub async fn handle_json_rpc_body(
        &self,
        body: &[u8],
    ) -> Result<Option<String>, serde_json::Error> {
        let Ok(text) = std::str::from_utf8(body) else {
            let response = RpcResponse::parse_error("invalid utf-8".to_owned());
            return serde_json::to_string(&response).map(Some);
        };

        // The first non-whitespace byte decides between single and batch.
        if !text.trim_start().starts_with('[') {
            return match self.run_request(text, false).await {
                Some(response) => serde_json::to_string(&response).map(Some),
                None => Ok(None),
            };
        }

        let requests: Vec<&RawValue> = match serde_json::from_str(text) {
            Ok(requests) => requests,
            Err(e) => {
                let response = RpcResponse::parse_error(e.to_string());
                return serde_json::to_string(&response).map(Some);
            }
        };
        if requests.is_empty() {
            let response = RpcResponse::invalid_request("empty batch".to_owned(), RequestId::Null);
            return serde_json::to_string(&response).map(Some);
        }

        let mut responses = Vec::new();
        for request in requests {
            if let Some(response) = self.run_request(request.get(), true).await {
                responses.push(serde_json::to_string(&response)?);
            }
        }

        // All notifications: no response array at all.
        if responses.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("[{}]", responses.join(","))))
    }

    /// Parses and executes a single request. Returns [None] if it is a
    /// well-formed notification.
    async fn run_request(&self, request: &str, in_batch: bool) -> Option<RpcResponse> {
        tracing::trace!(%request, "Running request");

        let request = match RpcRequest::parse(request) {
            Ok(request) => request,
            // At the top level undecodable bytes are a parse error; inside a
            // batch the array itself parsed, so the element is an invalid
            // request.
            Err(RequestParseError::Json(e)) if in_batch => {
                return Some(RpcResponse::invalid_request(e.to_string(), RequestId::Null));
            }
            Err(RequestParseError::Json(e)) => {
                return Some(RpcResponse::parse_error(e.to_string()));
            }
            Err(RequestParseError::Shape { reason, id }) => {
                return Some(RpcResponse::invalid_request(reason, id));
            }
        };

        let notification = request.id.is_notification();

        let Some((&method_name, method)) = self.methods.get_key_value(request.method.as_str())
        else {
            if notification {
                return None;
            }
            return Some(RpcResponse::method_not_found(request.id));
        };

        metrics::increment_counter!("rpc_method_calls_total", "method" => method_name);

        let output = match build_arguments(request.params, &method.params) {
            Ok(args) => {
                let invocation = method.endpoint.invoke(self.context.clone(), args);
                match std::panic::AssertUnwindSafe(invocation).catch_unwind().await {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(method = %method_name, backtrace = ?e, "RPC method panic'd");
                        Err(RpcError::InternalError(anyhow::anyhow!("RPC method panic'd")))
                    }
                }
            }
            Err(e) => Err(e),
        };

        if output.is_err() {
            metrics::increment_counter!("rpc_method_calls_failed_total", "method" => method_name);
        }

        if notification {
            return None;
        }
        Some(RpcResponse {
            output,
            id: request.id,
        })
    }
}

/// Maps the request's `params` member onto the configured parameter list.
///
/// Arrays bind positionally and must match the arity exactly. Objects bind
/// by parameter name; a missing optional parameter binds as `None`, which
/// the endpoint fills with the target type's default value.
fn build_arguments(params: Value, defs: &[Param]) -> Result<Vec<Option<Value>>, RpcError> {
    match params {
        Value::Null if defs.is_empty() => Ok(Vec::new()),
        Value::Null => Err(RpcError::InvalidParams("missing params".to_owned())),
        Value::Array(list) => {
            if list.len() != defs.len() {
                return Err(RpcError::InvalidParams(
                    "missing/unexpected params in list".to_owned(),
                ));
            }
            Ok(list.into_iter().map(Some).collect())
        }
        Value::Object(mut map) => defs
            .iter()
            .map(|def| match map.remove(def.name) {
                Some(value) => Ok(Some(value)),
                None if def.optional => Ok(None),
                None => Err(RpcError::InvalidParams(format!(
                    "missing non-optional param {}",
                    def.name
                ))),
            })
            .collect(),
        // Request sanity checks only let arrays and objects through.
        _ => Err(RpcError::InvalidParams(
            "params should be an array or an object".to_owned(),
        )),
    }
}

fn to_value<O: Serialize>(output: O) -> Result<Value, RpcError> {
    serde_json::to_value(output).map_err(|e| RpcError::InternalError(e.into()))
}

/// Decodes one bound argument into the handler's parameter type. Omitted
/// optional parameters take the type's default value.
fn bind_arg<P: DeserializeOwned + Default>(arg: Option<Value>) -> Result<P, RpcError> {
    match arg {
        Some(value) => {
            serde_json::from_value(value).map_err(|e| RpcError::InvalidParams(e.to_string()))
        }
        None => Ok(P::default()),
    }
}

/// Implemented for async functions of the shapes
/// `Fn(RpcContext) -> Result<O, RpcError>` and the one- and two-parameter
/// variants, where every parameter is deserializable with a default.
///
/// (The generic parameter exists so the trait can be blanket-implemented for
/// several `Fn` signatures at once.)
pub trait IntoMethod<I> {
    fn arity() -> usize;
    fn into_endpoint(self) -> Box<dyn MethodEndpoint>;
}

struct Method0<F, Fut, O>(F, PhantomData<fn() -> (Fut, O)>);

impl<F, Fut, O> MethodEndpoint for Method0<F, Fut, O>
where
    F: Fn(RpcContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
{
    fn invoke(&self, context: RpcContext, _args: Vec<Option<Value>>) -> MethodFuture {
        let fut = (self.0)(context);
        Box::pin(async move { fut.await.and_then(to_value) })
    }
}

impl<F, Fut, O> IntoMethod<(Fut, O)> for F
where
    F: Fn(RpcContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
{
    fn arity() -> usize {
        0
    }

    fn into_endpoint(self) -> Box<dyn MethodEndpoint> {
        Box::new(Method0(self, PhantomData))
    }
}

struct Method1<F, Fut, O, P1>(F, PhantomData<fn() -> (Fut, O, P1)>);

impl<F, Fut, O, P1> MethodEndpoint for Method1<F, Fut, O, P1>
where
    F: Fn(RpcContext, P1) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
    P1: DeserializeOwned + Default + 'static,
{
    fn invoke(&self, context: RpcContext, args: Vec<Option<Value>>) -> MethodFuture {
        let mut args = args.into_iter();
        let p1 = match bind_arg::<P1>(args.next().flatten()) {
            Ok(p1) => p1,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let fut = (self.0)(context, p1);
        Box::pin(async move { fut.await.and_then(to_value) })
    }
}

impl<F, Fut, O, P1> IntoMethod<(Fut, O, P1)> for F
where
    F: Fn(RpcContext, P1) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
    P1: DeserializeOwned + Default + 'static,
{
    fn arity() -> usize {
        1
    }

    fn into_endpoint(self) -> Box<dyn MethodEndpoint> {
        Box::new(Method1(self, PhantomData))
    }
}

struct Method2<F, Fut, O, P1, P2>(F, PhantomData<fn() -> (Fut, O, P1, P2)>);

impl<F, Fut, O, P1, P2> MethodEndpoint for Method2<F, Fut, O, P1, P2>
where
    F: Fn(RpcContext, P1, P2) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
    P1: DeserializeOwned + Default + 'static,
    P2: DeserializeOwned + Default + 'static,
{
    fn invoke(&self, context: RpcContext, args: Vec<Option<Value>>) -> MethodFuture {
        let mut args = args.into_iter();
        let p1 = match bind_arg::<P1>(args.next().flatten()) {
            Ok(p1) => p1,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let p2 = match bind_arg::<P2>(args.next().flatten()) {
            Ok(p2) => p2,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let fut = (self.0)(context, p1, p2);
        Box::pin(async move { fut.await.and_then(to_value) })
    }
}

impl<F, Fut, O, P1, P2> IntoMethod<(Fut, O, P1, P2)> for F
where
    F: Fn(RpcContext, P1, P2) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, RpcError>> + Send + 'static,
    O: Serialize + 'static,
    P1: DeserializeOwned + Default + 'static,
    P2: DeserializeOwned + Default + 'static,
{
    fn arity() -> usize {
        2
    }

    fn into_endpoint(self) -> Box<dyn MethodEndpoint> {
        Box::new(Method2(self, PhantomData))
    }
}

fn is_utf8_encoded_json(headers: &axum::http::HeaderMap) -> bool {
    let Some(content_type) = headers.get(axum::http::header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };

    // utf-8 is the default when the charset is missing.
    let valid_charset = mime
        .get_param(mime::CHARSET)
        .map(|charset| charset == "utf-8")
        .unwrap_or(true);

    // `application/json` or any `XXX+json`.
    let is_json = (mime.type_() == "application" && mime.subtype() == "json")
        || mime.suffix().is_some_and(|suffix| suffix == "json");

    is_json && valid_charset
}

/// The axum endpoint serving the router.
pub async fn rpc_handler(
    State(state): State<RpcRouter>,
    headers: axum::http::HeaderMap,
    method: axum::http::Method,
    body: axum::body::Bytes,
) -> axum::response::Response {
    if method != axum::http::Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    if !is_utf8_encoded_json(&headers) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    match state.handle_json_rpc_body(&body).await {
        Ok(Some(response)) => (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            response,
        )
            .into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize RPC response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::context::RpcContext;

    fn spec_router() -> RpcRouter {
        async fn subtract(
            _context: RpcContext,
            minuend: i64,
            subtrahend: i64,
        ) -> Result<i64, RpcError> {
            Ok(minuend - subtrahend)
        }

        async fn get_data(_context: RpcContext) -> Result<Vec<Value>, RpcError> {
            Ok(vec![json!("hello"), json!(5)])
        }

        RpcRouter::builder()
            .register(
                "subtract",
                vec![Param::required("minuend"), Param::required("subtrahend")],
                subtract,
            )
            .register("get_data", vec![], get_data)
            .build(RpcContext::for_tests())
    }

    async fn handle(router: &RpcRouter, request: &str) -> Option<Value> {
        router
            .handle_json_rpc_body(request.as_bytes())
            .await
            .unwrap()
            .map(|response| serde_json::from_str(&response).unwrap())
    }

    mod specification_tests {
        //! Test cases lifted from the [RPC specification](https://www.jsonrpc.org/specification),
        //! adapted to this server's parameter binding and error reasons.
        use super::*;
        use pretty_assertions::assert_eq;

        #[rstest]
        #[case::with_positional_params(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1}),
            json!({"jsonrpc": "2.0", "result": 19, "id": 1}),
        )]
        #[case::with_positional_params_switched(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": [23, 42], "id": 2}),
            json!({"jsonrpc": "2.0", "result": -19, "id": 2}),
        )]
        #[case::with_named_params(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": {"subtrahend": 23, "minuend": 42}, "id": 3}),
            json!({"jsonrpc": "2.0", "result": 19, "id": 3}),
        )]
        #[case::with_named_params_switched(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 42, "subtrahend": 23}, "id": 4}),
            json!({"jsonrpc": "2.0", "result": 19, "id": 4}),
        )]
        #[case::non_existent_method(
            json!({"jsonrpc": "2.0", "method": "foobar", "id": "1"}),
            json!({"jsonrpc": "2.0", "error": {"code": -32601, "message": "Method not found"}, "id": "1"}),
        )]
        #[case::method_must_be_a_string(
            json!({"jsonrpc": "2.0", "method": 1, "params": "bar"}),
            json!({"jsonrpc": "2.0", "id": null,
                "error": {"code": -32600, "message": "Invalid Request", "data": {
                    "reason": "method should be a string"
                }}}),
        )]
        #[case::version_must_be_2(
            json!({"jsonrpc": "1.0", "method": "subtract", "id": 6}),
            json!({"jsonrpc": "2.0", "id": 6,
                "error": {"code": -32600, "message": "Invalid Request", "data": {
                    "reason": "unsupported RPC request version"
                }}}),
        )]
        #[case::float_id_is_rejected(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1.5}),
            json!({"jsonrpc": "2.0", "id": null,
                "error": {"code": -32600, "message": "Invalid Request", "data": {
                    "reason": "id should be a string or an integer"
                }}}),
        )]
        #[case::positional_arity_mismatch(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": [42], "id": 7}),
            json!({"jsonrpc": "2.0", "id": 7,
                "error": {"code": -32602, "message": "Invalid params", "data": {
                    "reason": "missing/unexpected params in list"
                }}}),
        )]
        #[case::named_missing_required(
            json!({"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 42}, "id": 8}),
            json!({"jsonrpc": "2.0", "id": 8,
                "error": {"code": -32602, "message": "Invalid params", "data": {
                    "reason": "missing non-optional param subtrahend"
                }}}),
        )]
        #[case::empty_batch(
            json!([]),
            json!({"jsonrpc": "2.0", "id": null,
                "error": {"code": -32600, "message": "Invalid Request", "data": {
                    "reason": "empty batch"
                }}}),
        )]
        #[case::batch(
            json!([
                {"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": "1"},
                {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
                {"foo": "boo"},
                {"jsonrpc": "2.0", "method": "foo.get", "params": {"name": "myself"}, "id": "5"},
                {"jsonrpc": "2.0", "method": "get_data", "id": "9"}
            ]),
            json!([
                {"jsonrpc": "2.0", "result": 19, "id": "1"},
                {"jsonrpc": "2.0", "id": null,
                    "error": {"code": -32600, "message": "Invalid Request", "data": {
                        "reason": "unsupported RPC request version"
                    }}},
                {"jsonrpc": "2.0", "error": {"code": -32601, "message": "Method not found"}, "id": "5"},
                {"jsonrpc": "2.0", "result": ["hello", 5], "id": "9"}
            ]),
        )]
        #[tokio::test]
        async fn specification_test(#[case] request: Value, #[case] expected: Value) {
            let response = handle(&spec_router(), &request.to_string()).await.unwrap();
            assert_eq!(response, expected);
        }
    }

    #[rstest]
    #[case::known_method(json!({"jsonrpc": "2.0", "method": "subtract", "params": [1, 1]}))]
    #[case::unknown_method(json!({"jsonrpc": "2.0", "method": "foobar"}))]
    #[case::batch(json!([
        {"jsonrpc": "2.0", "method": "subtract", "params": [1, 2]},
        {"jsonrpc": "2.0", "method": "subtract", "params": [3, 4]}
    ]))]
    #[tokio::test]
    async fn notifications_produce_no_bytes(#[case] request: Value) {
        let router = spec_router();
        let response = router
            .handle_json_rpc_body(request.to_string().as_bytes())
            .await
            .unwrap();
        assert_eq!(response, None);
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let router = spec_router();
        let response = handle(
            &router,
            r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#,
        )
        .await
        .unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["error"]["message"], "Parse error");
        assert_eq!(response["id"], Value::Null);

        let response = handle(&router, r#"[{"jsonrpc": "2.0", "method""#).await.unwrap();
        assert_eq!(response["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn batch_elements_fail_individually() {
        let router = spec_router();
        let response = handle(&router, "[1, 2, 3]").await.unwrap();
        let elements = response.as_array().unwrap();
        assert_eq!(elements.len(), 3);
        for element in elements {
            assert_eq!(element["error"]["code"], -32600);
            assert_eq!(element["id"], Value::Null);
        }
    }

    #[tokio::test]
    async fn batch_responses_preserve_request_order() {
        let router = spec_router();
        let request = json!([
            {"jsonrpc": "2.0", "method": "subtract", "params": [3, 1], "id": 1},
            {"jsonrpc": "2.0", "method": "subtract", "params": [3, 2], "id": 2},
            {"jsonrpc": "2.0", "method": "subtract", "params": [3, 3], "id": 3},
        ]);
        let response = handle(&router, &request.to_string()).await.unwrap();
        let expected = json!([
            {"jsonrpc": "2.0", "result": 2, "id": 1},
            {"jsonrpc": "2.0", "result": 1, "id": 2},
            {"jsonrpc": "2.0", "result": 0, "id": 3},
        ]);
        assert_eq!(response, expected);
    }

    #[tokio::test]
    async fn optional_params_default_when_omitted() {
        async fn echo(_context: RpcContext, value: Option<i64>) -> Result<Option<i64>, RpcError> {
            Ok(value)
        }

        let router = RpcRouter::builder()
            .register("echo", vec![Param::optional("value")], echo)
            .build(RpcContext::for_tests());

        let response = handle(
            &router,
            &json!({"jsonrpc": "2.0", "method": "echo", "params": {}, "id": 1}).to_string(),
        )
        .await
        .unwrap();
        assert_eq!(response["result"], Value::Null);

        let response = handle(
            &router,
            &json!({"jsonrpc": "2.0", "method": "echo", "params": {"value": 3}, "id": 1})
                .to_string(),
        )
        .await
        .unwrap();
        assert_eq!(response["result"], 3);
    }

    #[tokio::test]
    async fn handler_panic_is_an_internal_error() {
        async fn panicky(_context: RpcContext) -> Result<i64, RpcError> {
            panic!("Oh no!");
        }

        let router = RpcRouter::builder()
            .register("panic", vec![], panicky)
            .build(RpcContext::for_tests());

        let response = handle(
            &router,
            &json!({"jsonrpc": "2.0", "method": "panic", "id": 1}).to_string(),
        )
        .await
        .unwrap();
        assert_eq!(
            response,
            json!({"jsonrpc": "2.0", "error": {"code": -32603, "message": "Internal error"}, "id": 1})
        );
    }

    #[tokio::test]
    async fn named_and_positional_binding_dispatch_identically() {
        let router = crate::register_methods(RpcContext::for_tests());

        let named = handle(
            &router,
            &json!({
                "jsonrpc": "2.0",
                "method": "starknet_getTransactionByHash",
                "params": {"transaction_hash": "0x222"},
                "id": 1
            })
            .to_string(),
        )
        .await
        .unwrap();
        let positional = handle(
            &router,
            &json!({
                "jsonrpc": "2.0",
                "method": "starknet_getTransactionByHash",
                "params": ["0x222"],
                "id": 1
            })
            .to_string(),
        )
        .await
        .unwrap();

        assert_eq!(named, positional);
        assert_eq!(named["result"]["transaction_hash"], "0x222");
    }

    mod http {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn spawn_server() -> String {
            let router = crate::register_methods(RpcContext::for_tests());
            let (_handle, addr) = crate::serve(router, "127.0.0.1:0".parse().unwrap())
                .await
                .unwrap();
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn request_over_http() {
            let url = spawn_server().await;
            let response = reqwest::Client::new()
                .post(url)
                .json(&json!({"jsonrpc": "2.0", "method": "starknet_chainId", "id": 1}))
                .send()
                .await
                .unwrap();

            assert_eq!(
                response.headers()[reqwest::header::CONTENT_TYPE],
                "application/json"
            );
            let body: Value = response.json().await.unwrap();
            assert_eq!(
                body,
                json!({"jsonrpc": "2.0", "result": "0x534e5f474f45524c49", "id": 1})
            );
        }

        #[tokio::test]
        async fn batch_over_http_suppresses_notifications() {
            let url = spawn_server().await;
            let body: Value = reqwest::Client::new()
                .post(url)
                .json(&json!([
                    {"jsonrpc": "2.0", "method": "starknet_chainId", "id": 1},
                    {"jsonrpc": "2.0", "method": "starknet_chainId"},
                    {"jsonrpc": "2.0", "method": "starknet_chainId", "id": "x"},
                ]))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();

            let elements = body.as_array().unwrap();
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[0]["id"], 1);
            assert_eq!(elements[1]["id"], "x");
        }

        #[tokio::test]
        async fn notification_has_empty_body() {
            let url = spawn_server().await;
            let response = reqwest::Client::new()
                .post(url)
                .json(&json!({"jsonrpc": "2.0", "method": "starknet_chainId"}))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
            assert_eq!(response.content_length(), Some(0));
        }

        #[tokio::test]
        async fn rejects_non_json_content_type() {
            let url = spawn_server().await;
            let response = reqwest::Client::new()
                .post(url)
                .body(json!({"jsonrpc": "2.0", "method": "starknet_chainId", "id": 1}).to_string())
                .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .send()
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE
            );
        }

        #[tokio::test]
        async fn accepts_json_with_charset_utf8() {
            let url = spawn_server().await;
            let response = reqwest::Client::new()
                .post(url)
                .body(json!({"jsonrpc": "2.0", "method": "starknet_chainId", "id": 1}).to_string())
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/json; charset=utf-8",
                )
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
        }

        #[tokio::test]
        async fn rejects_get_requests() {
            let url = spawn_server().await;
            let response = reqwest::Client::new().get(url).send().await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}
