use serde::{Deserialize, Serialize};

use crate::ServoStatus;

/// The controller expects `status` as 0 (off) or 1 (on), not a boolean.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetServoStatus {
    pub status: u8,
}

impl SetServoStatus {
    pub fn new(status: ServoStatus) -> Self {
        Self {
            status: status.into(),
        }
    }
}
