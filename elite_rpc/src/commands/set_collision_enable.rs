use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetCollisionEnable {
    pub enable: bool,
}

impl SetCollisionEnable {
    pub fn new(enable: bool) -> Self {
        Self {
            enable
        }
    }
}
