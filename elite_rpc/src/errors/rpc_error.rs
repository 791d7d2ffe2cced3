use std::error::Error;
use std::fmt;
use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

use crate::packets::ErrorPayload;

/// Faults raised while moving bytes over the controller socket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    Connect(String),
    Send(String),
    Receive(String),
    Closed,
    Timeout,
}

impl Error for TransportFault {}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TransportFault::Connect(ref msg) => write!(f, "ConnectError: {}", msg),
            TransportFault::Send(ref msg) => write!(f, "SendError: {}", msg),
            TransportFault::Receive(ref msg) => write!(f, "ReceiveError: {}", msg),
            TransportFault::Closed => write!(f, "controller closed the connection"),
            TransportFault::Timeout => write!(f, "timed out waiting for the controller"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// TCP handshake with the controller failed.
    ConnectionFailed(String),
    NotConnected,
    /// The reply could not be decoded into a result or an error.
    ProtocolDecode(String),
    /// Error code -32693: the teach pendant has not ceded control.
    RemoteModeRequired { method: String },
    /// Any other error reported by the controller.
    Command { method: String, payload: ErrorPayload },
    FileNotFound(String),
    Transport(TransportFault),
    /// The controller answered, but the result did not have the expected shape.
    InvalidResult { method: String, detail: String },
    Serialization(String),
}

impl Error for RpcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RpcError::Transport(fault) => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RpcError::ConnectionFailed(ref msg) => write!(f, "Could not connect: {}", msg),
            RpcError::NotConnected => write!(f, "Robot not connected"),
            RpcError::ProtocolDecode(ref msg) => write!(f, "Could not decode controller reply: {}", msg),
            RpcError::RemoteModeRequired { ref method } => write!(
                f,
                "Robot must be in Remote Mode to execute {}. Enable remote mode from the teach pendant.",
                method
            ),
            RpcError::Command { ref method, ref payload } => write!(
                f,
                "Can not execute {}: controller returned error#{} ({}): {}",
                method,
                payload.code,
                payload.kind().message(),
                payload.message
            ),
            RpcError::FileNotFound(ref name) => write!(f, "Jbi file {} does not exist.", name),
            RpcError::Transport(ref fault) => write!(f, "Transport error: {}", fault),
            RpcError::InvalidResult { ref method, ref detail } => {
                write!(f, "Unexpected result for {}: {}", method, detail)
            }
            RpcError::Serialization(ref msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl From<TransportFault> for RpcError {
    fn from(fault: TransportFault) -> Self {
        RpcError::Transport(fault)
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

/// Error codes the controller places in the `error.code` field.
///
/// The negative range below -32000 is reserved by JSON-RPC 2.0; -32693 is the
/// controller's own "remote mode not enabled" rejection.
#[repr(i32)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum ControllerErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    RemoteModeRequired = -32693,
    Unrecognized = 0,
}

impl ControllerErrorCode {
    pub const REMOTE_MODE_REQUIRED: i64 = -32693;

    pub fn from_code(code: i64) -> Self {
        i32::try_from(code)
            .ok()
            .and_then(|code| ControllerErrorCode::try_from(code).ok())
            .unwrap_or(ControllerErrorCode::Unrecognized)
    }

    pub fn message(&self) -> &str {
        match self {
            ControllerErrorCode::ParseError => "Parse error.",
            ControllerErrorCode::InvalidRequest => "Invalid Request.",
            ControllerErrorCode::MethodNotFound => "Method not found.",
            ControllerErrorCode::InvalidParams => "Invalid params.",
            ControllerErrorCode::InternalError => "Internal error.",
            ControllerErrorCode::RemoteModeRequired => "Remote mode not enabled.",
            ControllerErrorCode::Unrecognized => "Unrecognized controller error code",
        }
    }
}
