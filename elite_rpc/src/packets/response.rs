use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ControllerErrorCode;

/// The `error` object of a failed call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorPayload {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorPayload {
    pub fn kind(&self) -> ControllerErrorCode {
        ControllerErrorCode::from_code(self.code)
    }

    pub fn is_remote_mode_required(&self) -> bool {
        self.code == ControllerErrorCode::REMOTE_MODE_REQUIRED
    }
}

/// What a single reply decoded to. `id` is `None` when the controller sent
/// `"id": null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success { id: Option<u64>, result: Value },
    Error { id: Option<u64>, payload: ErrorPayload },
    Malformed(String),
}

impl ResponseOutcome {
    /// Decodes one reply line. Never fails: anything that is not a well formed
    /// result or error becomes `Malformed` with the reason attached.
    ///
    /// The controller double-encodes results, so a string `result` is parsed
    /// again as JSON. A non-string `result` is taken as is, except `null`,
    /// which counts as absent.
    pub fn decode(bytes: &[u8]) -> Self {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.trim(),
            Err(e) => return ResponseOutcome::Malformed(format!("invalid UTF-8: {}", e)),
        };

        let mut fields = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => return ResponseOutcome::Malformed(format!("expected an object, got {}", other)),
            Err(e) => return ResponseOutcome::Malformed(format!("invalid JSON: {}", e)),
        };

        let id = match fields.remove("id") {
            Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_u64() {
                Some(id) => Some(id),
                None => return ResponseOutcome::Malformed(format!("invalid id: {}", n)),
            },
            Some(other) => return ResponseOutcome::Malformed(format!("invalid id: {}", other)),
            None => return ResponseOutcome::Malformed("missing id".to_string()),
        };

        // JSON-RPC 1.0 style replies carry `"result": null` next to an error.
        let result = fields.remove("result").filter(|r| !r.is_null());
        let error = fields.remove("error").filter(|e| !e.is_null());

        if let Some(result) = result {
            let result = match result {
                Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
                    Ok(decoded) => decoded,
                    Err(e) => return ResponseOutcome::Malformed(format!("result is not JSON: {}", e)),
                },
                other => other,
            };
            ResponseOutcome::Success { id, result }
        } else if let Some(error) = error {
            match serde_json::from_value::<ErrorPayload>(error) {
                Ok(payload) => ResponseOutcome::Error { id, payload },
                Err(e) => ResponseOutcome::Malformed(format!("invalid error payload: {}", e)),
            }
        } else {
            ResponseOutcome::Malformed("reply has neither result nor error".to_string())
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            ResponseOutcome::Success { id, .. } | ResponseOutcome::Error { id, .. } => *id,
            ResponseOutcome::Malformed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn double_encoded_result_is_unwrapped() {
        let reply = br#"{"jsonrpc":"2.0","result":"3","id":1}"#;
        assert_eq!(
            ResponseOutcome::decode(reply),
            ResponseOutcome::Success { id: Some(1), result: json!(3) }
        );
    }

    #[test]
    fn structured_result_survives_double_encoding() {
        let reply = br#"{"jsonrpc":"2.0","result":"{\"jbiName\":\"cashify\",\"runState\":3}","id":4}"#;
        match ResponseOutcome::decode(reply) {
            ResponseOutcome::Success { id, result } => {
                assert_eq!(id, Some(4));
                assert_eq!(result["jbiName"], "cashify");
                assert_eq!(result["runState"], 3);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn error_reply_keeps_payload() {
        let reply = br#"{"jsonrpc":"2.0","error":{"code":-32693,"message":"remote mode"},"id":2}"#;
        match ResponseOutcome::decode(reply) {
            ResponseOutcome::Error { id, payload } => {
                assert_eq!(id, Some(2));
                assert!(payload.is_remote_mode_required());
                assert_eq!(payload.kind(), ControllerErrorCode::RemoteModeRequired);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn reply_without_result_or_error_is_malformed() {
        let reply = br#"{"jsonrpc":"2.0","id":1}"#;
        assert!(matches!(ResponseOutcome::decode(reply), ResponseOutcome::Malformed(_)));
    }

    #[test]
    fn null_result_beside_error_is_an_error() {
        let reply = br#"{"result":null,"error":{"code":-32693,"message":"remote mode"},"id":1}"#;
        match ResponseOutcome::decode(reply) {
            ResponseOutcome::Error { id, payload } => {
                assert_eq!(id, Some(1));
                assert!(payload.is_remote_mode_required());
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn null_result_alone_is_malformed() {
        let reply = br#"{"jsonrpc":"2.0","result":null,"id":1}"#;
        assert!(matches!(ResponseOutcome::decode(reply), ResponseOutcome::Malformed(_)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(ResponseOutcome::decode(b"not json\n"), ResponseOutcome::Malformed(_)));
        assert!(matches!(ResponseOutcome::decode(&[0xff, 0xfe, 0x00]), ResponseOutcome::Malformed(_)));
        assert!(matches!(ResponseOutcome::decode(b"[1,2,3]"), ResponseOutcome::Malformed(_)));
        assert!(matches!(ResponseOutcome::decode(b""), ResponseOutcome::Malformed(_)));
    }

    #[test]
    fn result_string_that_is_not_json_is_malformed() {
        let reply = br#"{"jsonrpc":"2.0","result":"ok then","id":1}"#;
        assert!(matches!(ResponseOutcome::decode(reply), ResponseOutcome::Malformed(_)));
    }

    #[test]
    fn error_without_code_is_malformed() {
        let reply = br#"{"jsonrpc":"2.0","error":{"message":"??"},"id":1}"#;
        assert!(matches!(ResponseOutcome::decode(reply), ResponseOutcome::Malformed(_)));
    }

    #[test]
    fn null_id_is_accepted() {
        let reply = br#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}"#;
        let outcome = ResponseOutcome::decode(reply);
        assert_eq!(outcome.id(), None);
        assert!(!outcome.is_success());
    }
}
