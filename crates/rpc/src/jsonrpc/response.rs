use serde_json::Value;

use crate::jsonrpc::error::RpcError;
use crate::jsonrpc::RequestId;

#[derive(Debug, PartialEq)]
pub struct RpcResponse {
    pub output: Result<Value, RpcError>,
    pub id: RequestId,
}

impl RpcResponse {
    pub fn parse_error(reason: String) -> RpcResponse {
        Self {
            output: Err(RpcError::ParseError(reason)),
            id: RequestId::Null,
        }
    }

    pub fn invalid_request(reason: String, id: RequestId) -> RpcResponse {
        Self {
            output: Err(RpcError::InvalidRequest(reason)),
            id,
        }
    }

    pub fn method_not_found(id: RequestId) -> RpcResponse {
        Self {
            output: Err(RpcError::MethodNotFound),
            id,
        }
    }
}

impl serde::Serialize for RpcResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut obj = serializer.serialize_map(Some(3))?;
        obj.serialize_entry("jsonrpc", "2.0")?;

        match &self.output {
            Ok(value) => obj.serialize_entry("result", value)?,
            Err(error) => obj.serialize_entry("error", error)?,
        };

        match &self.id {
            RequestId::Number(n) => obj.serialize_entry("id", n)?,
            RequestId::String(s) => obj.serialize_entry("id", s)?,
            RequestId::Null => obj.serialize_entry("id", &Value::Null)?,
            // Notifications are suppressed before serialization; a stray one
            // still produces a valid envelope.
            RequestId::Notification => obj.serialize_entry("id", &Value::Null)?,
        };

        obj.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_envelope() {
        let serialized = serde_json::to_value(RpcResponse {
            output: Ok(Value::String("foobar".to_owned())),
            id: RequestId::Number(1),
        })
        .unwrap();

        assert_eq!(
            serialized,
            json!({"jsonrpc": "2.0", "result": "foobar", "id": 1})
        );
    }

    #[test]
    fn error_envelope() {
        let serialized = serde_json::to_value(RpcResponse {
            output: Err(RpcError::InvalidParams("missing foo".to_owned())),
            id: RequestId::String("abc".to_owned()),
        })
        .unwrap();

        assert_eq!(
            serialized,
            json!({
                "jsonrpc": "2.0",
                "error": {
                    "code": -32602,
                    "message": "Invalid params",
                    "data": {"reason": "missing foo"},
                },
                "id": "abc",
            })
        );
    }

    #[test]
    fn internal_error_is_opaque() {
        let serialized = serde_json::to_value(RpcResponse {
            output: Err(RpcError::InternalError(anyhow::anyhow!("db on fire"))),
            id: RequestId::Number(1),
        })
        .unwrap();

        assert_eq!(
            serialized,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32603, "message": "Internal error"},
                "id": 1,
            })
        );
    }
}
