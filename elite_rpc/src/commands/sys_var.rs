use serde::{Deserialize, Serialize};

use crate::VariableValue;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SysVarAddress {
    pub addr: u32,
}

impl SysVarAddress {
    pub fn new(addr: u32) -> Self {
        Self {
            addr
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SysVarAssignment {
    pub addr: u32,
    pub value: VariableValue,
}

impl SysVarAssignment {
    pub fn new(addr: u32, value: VariableValue) -> Self {
        Self {
            addr,
            value,
        }
    }
}
