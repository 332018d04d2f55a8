use serde::Deserialize;
use serde_json::Value;

use crate::jsonrpc::RequestId;

/// A request that passed all shape checks.
#[derive(Debug, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    /// `Null` when the member was absent.
    pub params: Value,
    pub id: RequestId,
}

/// Why raw request bytes could not be turned into an [RpcRequest].
#[derive(Debug)]
pub(crate) enum RequestParseError {
    /// Not decodable as a request object at all.
    Json(serde_json::Error),
    /// Decoded, but failed a shape check. `id` is what a response should
    /// echo: the request id where it was readable, `Null` when the id itself
    /// was at fault.
    Shape { reason: String, id: RequestId },
}

const INVALID_ID: &str = "id should be a string or an integer";

impl RpcRequest {
    pub(crate) fn parse(raw: &str) -> Result<RpcRequest, RequestParseError> {
        // Stage one: pull the members out with no type expectations, so that
        // a readable id survives shape failures elsewhere in the object.
        #[derive(Deserialize)]
        struct Helper {
            jsonrpc: Option<Value>,
            // Double-bagged to tell an absent id (notification) from a null
            // one; serde folds both into one `None` otherwise.
            #[serde(default, deserialize_with = "deserialize_some")]
            id: Option<Option<Value>>,
            method: Option<Value>,
            #[serde(default)]
            params: Option<Value>,
        }

        fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: Deserialize<'de>,
            D: serde::Deserializer<'de>,
        {
            Deserialize::deserialize(deserializer).map(Some)
        }

        let helper: Helper = serde_json::from_str(raw).map_err(RequestParseError::Json)?;

        // Stage two: shape checks, id first since later failures echo it.
        let id = match helper.id {
            None => RequestId::Notification,
            Some(None) => RequestId::Null,
            Some(Some(Value::String(s))) => RequestId::String(s),
            Some(Some(Value::Number(n))) => match n.as_i64() {
                Some(n) => RequestId::Number(n),
                // Floats and out-of-range integers are rejected without
                // echoing them back.
                None => {
                    return Err(RequestParseError::Shape {
                        reason: INVALID_ID.to_owned(),
                        id: RequestId::Null,
                    })
                }
            },
            Some(Some(_)) => {
                return Err(RequestParseError::Shape {
                    reason: INVALID_ID.to_owned(),
                    id: RequestId::Null,
                })
            }
        };

        let shape_error = |reason: &str, id: &RequestId| RequestParseError::Shape {
            reason: reason.to_owned(),
            // A response to an invalid request that carried no id uses null.
            id: match id {
                RequestId::Notification => RequestId::Null,
                other => other.clone(),
            },
        };

        match helper.jsonrpc {
            Some(Value::String(version)) if version == "2.0" => {}
            _ => return Err(shape_error("unsupported RPC request version", &id)),
        }

        let method = match helper.method {
            Some(Value::String(method)) if !method.is_empty() => method,
            Some(Value::String(_)) | None => {
                return Err(shape_error("no method specified", &id))
            }
            Some(_) => return Err(shape_error("method should be a string", &id)),
        };

        let params = match helper.params {
            None | Some(Value::Null) => Value::Null,
            Some(params @ (Value::Array(_) | Value::Object(_))) => params,
            Some(_) => {
                return Err(shape_error("params should be an array or an object", &id))
            }
        };

        Ok(RpcRequest { method, params, id })
    }
}
