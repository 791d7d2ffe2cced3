use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connected,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Unconnected
    }
}
