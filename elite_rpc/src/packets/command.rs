use serde::Serialize;
use serde_json::Value;

use crate::commands::*;
use crate::RpcError;

/// Every named command the robot facade issues.
///
/// Serializes adjacently tagged as `{"method": ..., "params": ...}`; unit
/// variants carry no `params` key and are sent with an empty array.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "method", content = "params")]
pub enum Command {
    #[serde(rename = "getRobotState")]
    GetRobotState,

    #[serde(rename = "getRobotMode")]
    GetRobotMode,

    #[serde(rename = "getCollisionEnable")]
    GetCollisionEnable,

    #[serde(rename = "setCollisionEnable")]
    SetCollisionEnable(SetCollisionEnable),

    #[serde(rename = "getServoStatus")]
    GetServoStatus,

    #[serde(rename = "set_servo_status")]
    SetServoStatus(SetServoStatus),

    #[serde(rename = "getSysVarB")]
    GetSysVarB(SysVarAddress),

    #[serde(rename = "getSysVarI")]
    GetSysVarI(SysVarAddress),

    #[serde(rename = "getSysVarD")]
    GetSysVarD(SysVarAddress),

    #[serde(rename = "setSysVarB")]
    SetSysVarB(SysVarAssignment),

    #[serde(rename = "setSysVarI")]
    SetSysVarI(SysVarAssignment),

    #[serde(rename = "setSysVarD")]
    SetSysVarD(SysVarAssignment),

    #[serde(rename = "stop")]
    Stop,

    #[serde(rename = "pause")]
    Pause,

    #[serde(rename = "run")]
    Run,

    #[serde(rename = "setSpeed")]
    SetSpeed(SetSpeed),

    #[serde(rename = "checkJbiExist")]
    CheckJbiExist(JbiFile),

    #[serde(rename = "runJbi")]
    RunJbi(JbiFile),

    #[serde(rename = "getJbiState")]
    GetJbiState,
}

impl Command {
    /// Splits the command into the method name and params that go into a
    /// request envelope.
    pub fn into_parts(self) -> Result<(String, Value), RpcError> {
        let value = serde_json::to_value(&self)
            .map_err(|e| RpcError::Serialization(e.to_string()))?;

        let Value::Object(mut fields) = value else {
            return Err(RpcError::Serialization(format!("{:?} did not serialize to an object", self)));
        };

        let method = match fields.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(RpcError::Serialization(format!("{:?} has no method name", self))),
        };
        let params = fields.remove("params").unwrap_or(Value::Array(Vec::new()));

        Ok((method, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_commands_have_empty_params() {
        let (method, params) = Command::GetRobotState.into_parts().unwrap();
        assert_eq!(method, "getRobotState");
        assert_eq!(params, json!([]));
    }

    #[test]
    fn servo_status_is_sent_as_integer() {
        let command = Command::SetServoStatus(SetServoStatus::new(crate::ServoStatus::On));
        let (method, params) = command.into_parts().unwrap();
        assert_eq!(method, "set_servo_status");
        assert_eq!(params, json!({ "status": 1 }));
    }

    #[test]
    fn jbi_commands_carry_filename() {
        let (method, params) = Command::RunJbi(JbiFile::new("cashify")).into_parts().unwrap();
        assert_eq!(method, "runJbi");
        assert_eq!(params, json!({ "filename": "cashify" }));
    }
}
