use std::fmt;

use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

pub mod drivers;

pub mod packets;
pub mod commands;
pub mod errors;
pub use errors::*;

use packets::Command;
use commands::{SysVarAddress, SysVarAssignment};

/// JSON-RPC types used to talk to the controller.
pub mod protocol {
    pub use super::packets::*;
    pub use super::commands::*;
}

/// Run state reported by `getRobotState`.
///
/// Ordinals outside 0..=5 are a decode error; they are never wrapped.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotState {
    Stop = 0,
    Pause = 1,
    EmergencyStop = 2,
    Running = 3,
    Alarm = 4,
    Collision = 5,
}

impl RobotState {
    pub fn label(&self) -> &'static str {
        match self {
            RobotState::Stop => "STOP",
            RobotState::Pause => "PAUSE",
            RobotState::EmergencyStop => "EMERGENCY_STOP",
            RobotState::Running => "RUNNING",
            RobotState::Alarm => "ALARM",
            RobotState::Collision => "COLLISION",
        }
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operating mode reported by `getRobotMode`. Write commands are only
/// accepted in `Remote`.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotMode {
    Teaching = 0,
    Operating = 1,
    Remote = 2,
}

impl RobotMode {
    pub fn label(&self) -> &'static str {
        match self {
            RobotMode::Teaching => "TEACHING",
            RobotMode::Operating => "OPERATING",
            RobotMode::Remote => "REMOTE",
        }
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Servo power as sent to `set_servo_status`.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
pub enum ServoStatus {
    Off = 0,
    On = 1,
}

impl From<bool> for ServoStatus {
    fn from(on: bool) -> Self {
        if on { ServoStatus::On } else { ServoStatus::Off }
    }
}

/// System variable classes exposed by the controller's variable store.
///
/// Each class maps to a fixed `get*`/`set*` method pair, so no caller supplied
/// text ever reaches the method name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Byte-sized integer slots (`SysVarB`).
    SysVarB,
    /// Integer slots (`SysVarI`).
    SysVarI,
    /// Double slots (`SysVarD`).
    SysVarD,
}

impl VariableType {
    pub fn getter(&self, addr: u32) -> Command {
        let params = SysVarAddress::new(addr);
        match self {
            VariableType::SysVarB => Command::GetSysVarB(params),
            VariableType::SysVarI => Command::GetSysVarI(params),
            VariableType::SysVarD => Command::GetSysVarD(params),
        }
    }

    pub fn setter(&self, addr: u32, value: VariableValue) -> Command {
        let params = SysVarAssignment::new(addr, value);
        match self {
            VariableType::SysVarB => Command::SetSysVarB(params),
            VariableType::SysVarI => Command::SetSysVarI(params),
            VariableType::SysVarD => Command::SetSysVarD(params),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum VariableValue {
    Int(i64),
    Double(f64),
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::Int(value)
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::Int(value.into())
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Double(value)
    }
}
