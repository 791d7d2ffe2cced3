use serde::{Deserialize, Serialize};

/// Speed override in percent. The controller accepts [0.05, 100]; no range
/// check is made here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SetSpeed {
    pub value: f64,
}

impl SetSpeed {
    pub fn new(value: f64) -> Self {
        Self {
            value
        }
    }
}
