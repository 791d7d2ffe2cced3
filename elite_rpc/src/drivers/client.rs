use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::packets::{RequestEnvelope, ResponseOutcome};
use crate::RpcError;

use super::{ConnectionState, EliteDriverConfig, Transport};

/// Sequences single request/response exchanges with the controller.
///
/// Every call-issuing method takes `&mut self`: one client has at most one
/// request in flight. Share it between tasks behind a `tokio::sync::Mutex`.
#[derive(Debug)]
pub struct CommandClient {
    pub config: EliteDriverConfig,
    pub log_channel: broadcast::Sender<String>,
    transport: Option<Transport>,
    next_id: u64,
}

impl CommandClient {
    pub fn new(config: EliteDriverConfig) -> Self {
        let (log_channel, _rx) = broadcast::channel(100);
        Self {
            config,
            log_channel,
            transport: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.transport.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Unconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// The id the next `call` will use.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Mirrors every sent and received line.
    pub fn subscribe_log(&self) -> broadcast::Receiver<String> {
        self.log_channel.subscribe()
    }

    fn log_message<T: Into<String>>(&self, message: T) {
        let message = message.into();
        debug!("{}", message);
        let _ = self.log_channel.send(message);
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }

    /// Opens the socket. A client that is already connected drops its old
    /// socket first.
    pub async fn connect(&mut self) -> Result<String, RpcError> {
        self.config.validate().map_err(RpcError::ConnectionFailed)?;

        if let Some(mut old) = self.transport.take() {
            old.close().await;
        }

        let url = self.config.connection_url();
        let opened = Transport::open(
            &url,
            self.config.connect_timeout,
            self.config.recv_buffer_size,
            self.config.response_timeout,
        )
        .await;

        match opened {
            Ok(transport) => {
                self.transport = Some(transport);
                info!("Connected to controller at {}", url);
                Ok(format!("Robot connected at IP:{}", self.config.addr))
            }
            Err(e) => {
                warn!("Failed to connect to controller at {}: {}", url, e);
                Err(RpcError::ConnectionFailed(format!(
                    "Cannot connect at IP:{} ({})",
                    self.config.addr, e
                )))
            }
        }
    }

    /// Always succeeds, whether or not a socket was open.
    pub async fn disconnect(&mut self) -> String {
        match self.transport.take() {
            Some(mut transport) => {
                transport.close().await;
                info!("Disconnected from controller at {}", self.config.connection_url());
                "Robot Disconnect Success".to_string()
            }
            None => "Robot Disconnect Success, Robot was already disconnected.".to_string(),
        }
    }

    /// One round trip with a client-assigned id.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<ResponseOutcome, RpcError> {
        if self.transport.is_none() {
            return Err(RpcError::NotConnected);
        }
        let id = self.take_id();
        self.call_with_id(method, params, id).await
    }

    /// One round trip with a caller-supplied id.
    ///
    /// Controller-side failures come back as `Ok(ResponseOutcome::Error)`;
    /// `Err` means the request never completed. A transport fault releases the
    /// socket, leaving the client unconnected.
    pub async fn call_with_id(
        &mut self,
        method: &str,
        params: Value,
        id: u64,
    ) -> Result<ResponseOutcome, RpcError> {
        if self.transport.is_none() {
            return Err(RpcError::NotConnected);
        }

        let line = RequestEnvelope::new(method, params, id).encode()?;
        self.log_message(format!("Sent: {}", line.trim_end()));

        let exchanged = match self.transport.as_mut() {
            Some(transport) => transport.send_and_receive(line.as_bytes()).await,
            None => return Err(RpcError::NotConnected),
        };

        let reply = match exchanged {
            Ok(reply) => reply,
            Err(fault) => {
                warn!("{} failed: {}", method, fault);
                if let Some(mut transport) = self.transport.take() {
                    transport.close().await;
                }
                return Err(RpcError::Transport(fault));
            }
        };

        self.log_message(format!("Received: {}", String::from_utf8_lossy(&reply)));

        let outcome = ResponseOutcome::decode(&reply);
        match outcome {
            ResponseOutcome::Malformed(ref reason) => {
                warn!("Undecodable reply to {}: {}", method, reason);
            }
            _ => {
                if let Some(reply_id) = outcome.id() {
                    if reply_id != id {
                        warn!("Reply to {} carried id {} but request id was {}", method, reply_id, id);
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Like `call`, but a controller error becomes `Err`.
    ///
    /// Error code -32693 is reported as `RpcError::RemoteModeRequired`; every
    /// other code as `RpcError::Command` with the raw payload.
    pub async fn execute(&mut self, method: &str, params: Value) -> Result<(u64, Value), RpcError> {
        if self.transport.is_none() {
            return Err(RpcError::NotConnected);
        }
        let request_id = self.take_id();

        match self.call_with_id(method, params, request_id).await? {
            ResponseOutcome::Success { id, result } => Ok((id.unwrap_or(request_id), result)),
            ResponseOutcome::Error { payload, .. } if payload.is_remote_mode_required() => {
                warn!("{} rejected: remote mode is not enabled", method);
                Err(RpcError::RemoteModeRequired {
                    method: method.to_string(),
                })
            }
            ResponseOutcome::Error { payload, .. } => {
                warn!("{} rejected: error#{} {}", method, payload.code, payload.message);
                Err(RpcError::Command {
                    method: method.to_string(),
                    payload,
                })
            }
            ResponseOutcome::Malformed(reason) => Err(RpcError::ProtocolDecode(reason)),
        }
    }
}
