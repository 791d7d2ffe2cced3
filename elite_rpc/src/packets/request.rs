use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// A single request line sent to the controller.
///
/// Field order matches what the controller's own tooling emits:
/// `{"method":..,"params":..,"jsonrpc":"2.0","id":..}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub method: String,
    pub params: Value,
    pub jsonrpc: String,
    pub id: u64,
}

impl RequestEnvelope {
    /// Absent or empty params are sent as `[]`, never `null` or `{}`.
    pub fn new<T: Into<String>>(method: T, params: Value, id: u64) -> Self {
        let params = match params {
            Value::Null => Value::Array(Vec::new()),
            Value::Object(ref fields) if fields.is_empty() => Value::Array(Vec::new()),
            other => other,
        };
        Self {
            method: method.into(),
            params,
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
        }
    }

    /// Serializes to a single newline-terminated line.
    pub fn encode(&self) -> Result<String, RpcError> {
        serde_json::to_string(self)
            .map(|line| line + "\n")
            .map_err(|e| RpcError::Serialization(e.to_string()))
    }
}
