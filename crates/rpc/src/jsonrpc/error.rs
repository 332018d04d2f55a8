use serde_json::{json, Value};

use crate::error::ApplicationError;

#[derive(Debug)]
pub enum RpcError {
    ParseError(String),
    InvalidRequest(String),
    MethodNotFound,
    InvalidParams(String),
    InternalError(anyhow::Error),
    /// A handler's own error, passed through the envelope verbatim.
    ApplicationError(ApplicationError),
}

impl PartialEq for RpcError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InternalError(l), Self::InternalError(r)) => l.to_string() == r.to_string(),
            (Self::ApplicationError(l), Self::ApplicationError(r)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl RpcError {
    pub fn code(&self) -> i32 {
        // From the json-rpc specification: https://www.jsonrpc.org/specification#error_object
        match self {
            RpcError::ParseError(..) => -32700,
            RpcError::InvalidRequest(..) => -32600,
            RpcError::MethodNotFound => -32601,
            RpcError::InvalidParams(..) => -32602,
            RpcError::InternalError(..) => -32603,
            RpcError::ApplicationError(e) => e.code(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            RpcError::ParseError(..) => "Parse error".to_owned(),
            RpcError::InvalidRequest(..) => "Invalid Request".to_owned(),
            RpcError::MethodNotFound => "Method not found".to_owned(),
            RpcError::InvalidParams(..) => "Invalid params".to_owned(),
            RpcError::InternalError(..) => "Internal error".to_owned(),
            RpcError::ApplicationError(e) => e.to_string(),
        }
    }

    pub fn data(&self) -> Option<Value> {
        match self {
            RpcError::ParseError(reason)
            | RpcError::InvalidRequest(reason)
            | RpcError::InvalidParams(reason) => Some(json!({ "reason": reason })),
            // Internal detail stays out of the envelope.
            RpcError::InternalError(..) => None,
            RpcError::MethodNotFound => None,
            RpcError::ApplicationError(..) => None,
        }
    }
}

impl serde::Serialize for RpcError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut obj = serializer.serialize_map(None)?;
        obj.serialize_entry("code", &self.code())?;
        obj.serialize_entry("message", &self.message())?;
        if let Some(data) = self.data() {
            obj.serialize_entry("data", &data)?;
        }
        obj.end()
    }
}

impl From<ApplicationError> for RpcError {
    fn from(e: ApplicationError) -> Self {
        Self::ApplicationError(e)
    }
}

impl From<anyhow::Error> for RpcError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalError(e)
    }
}
