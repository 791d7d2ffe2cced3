use serde_json::Value;

pub use crate::commands::*;
pub use crate::packets::*;
pub use crate::{RobotMode, RobotState, ServoStatus, VariableType, VariableValue};
use crate::{Result, RpcError};

use super::{CommandClient, EliteDriverConfig};

/// Typed operations on top of [`CommandClient`].
///
/// # Example
///
/// ```rust,ignore
/// let mut robot = Robot::new(EliteDriverConfig::new("192.168.0.2".to_string(), 8055));
/// robot.connect().await?;
///
/// if robot.get_status().await? == RobotState::Stop {
///     robot.run_jbi("cashify").await?;
/// }
/// robot.disconnect().await;
/// ```
#[derive(Debug)]
pub struct Robot {
    client: CommandClient,
}

impl Robot {
    pub fn new(config: EliteDriverConfig) -> Self {
        Self {
            client: CommandClient::new(config),
        }
    }

    pub fn client(&self) -> &CommandClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut CommandClient {
        &mut self.client
    }

    pub fn config(&self) -> &EliteDriverConfig {
        &self.client.config
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub async fn connect(&mut self) -> Result<String> {
        self.client.connect().await
    }

    pub async fn disconnect(&mut self) -> String {
        self.client.disconnect().await
    }

    /// Issues an arbitrary method, for callers that need a command this type
    /// does not wrap.
    pub async fn execute(&mut self, method: &str, params: Value) -> Result<(u64, Value)> {
        self.client.execute(method, params).await
    }

    /// Returns the method name alongside the result for error reporting.
    async fn send(&mut self, command: Command) -> Result<(String, Value)> {
        let (method, params) = command.into_parts()?;
        let (_, result) = self.client.execute(&method, params).await?;
        Ok((method, result))
    }

    pub async fn get_status(&mut self) -> Result<RobotState> {
        let (method, result) = self.send(Command::GetRobotState).await?;
        let ordinal = ordinal(&method, &result)?;
        RobotState::try_from(ordinal)
            .map_err(|_| invalid(&method, format!("run state {} is out of range", ordinal)))
    }

    pub async fn get_robot_mode(&mut self) -> Result<RobotMode> {
        let (method, result) = self.send(Command::GetRobotMode).await?;
        let ordinal = ordinal(&method, &result)?;
        RobotMode::try_from(ordinal)
            .map_err(|_| invalid(&method, format!("robot mode {} is out of range", ordinal)))
    }

    /// `true` when collision detection is enabled.
    pub async fn get_collision_status(&mut self) -> Result<bool> {
        let (method, result) = self.send(Command::GetCollisionEnable).await?;
        flag(&method, &result)
    }

    pub async fn set_collision_detection(&mut self, enable: bool) -> Result<bool> {
        let (method, result) = self
            .send(Command::SetCollisionEnable(SetCollisionEnable::new(enable)))
            .await?;
        flag(&method, &result)
    }

    pub async fn get_servo_status(&mut self) -> Result<bool> {
        let (method, result) = self.send(Command::GetServoStatus).await?;
        flag(&method, &result)
    }

    pub async fn set_servo_status(&mut self, status: ServoStatus) -> Result<bool> {
        let (method, result) = self
            .send(Command::SetServoStatus(SetServoStatus::new(status)))
            .await?;
        flag(&method, &result)
    }

    pub async fn get_variable(&mut self, kind: VariableType, addr: u32) -> Result<VariableValue> {
        let (method, result) = self.send(kind.getter(addr)).await?;
        serde_json::from_value::<VariableValue>(result.clone())
            .map_err(|_| invalid(&method, format!("expected a number, got {}", result)))
    }

    pub async fn set_variable<V: Into<VariableValue>>(
        &mut self,
        kind: VariableType,
        addr: u32,
        value: V,
    ) -> Result<bool> {
        let (method, result) = self.send(kind.setter(addr, value.into())).await?;
        flag(&method, &result)
    }

    pub async fn stop_operation(&mut self) -> Result<bool> {
        let (method, result) = self.send(Command::Stop).await?;
        flag(&method, &result)
    }

    pub async fn pause(&mut self) -> Result<bool> {
        let (method, result) = self.send(Command::Pause).await?;
        flag(&method, &result)
    }

    pub async fn run(&mut self) -> Result<bool> {
        let (method, result) = self.send(Command::Run).await?;
        flag(&method, &result)
    }

    /// Sets the speed override. The controller accepts [0.05, 100]; the value
    /// is passed through unchecked.
    pub async fn set_speed(&mut self, value: f64) -> Result<bool> {
        let (method, result) = self.send(Command::SetSpeed(SetSpeed::new(value))).await?;
        flag(&method, &result)
    }

    pub async fn check_jbi_exist(&mut self, filename: &str) -> Result<bool> {
        let (method, result) = self.send(Command::CheckJbiExist(JbiFile::new(filename))).await?;
        flag(&method, &result)
    }

    /// Runs a JBI program. `runJbi` is only issued after `checkJbiExist`
    /// reports the file present.
    pub async fn run_jbi(&mut self, filename: &str) -> Result<bool> {
        if !self.check_jbi_exist(filename).await? {
            return Err(RpcError::FileNotFound(filename.to_string()));
        }
        let (method, result) = self.send(Command::RunJbi(JbiFile::new(filename))).await?;
        flag(&method, &result)
    }

    /// Raw state of the running JBI program.
    pub async fn get_jbi_state(&mut self) -> Result<Value> {
        self.send(Command::GetJbiState).await.map(|(_, result)| result)
    }
}

fn invalid(method: &str, detail: String) -> RpcError {
    RpcError::InvalidResult {
        method: method.to_string(),
        detail,
    }
}

fn ordinal(method: &str, result: &Value) -> Result<u8> {
    result
        .as_u64()
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| invalid(method, format!("expected a non-negative integer, got {}", result)))
}

/// The controller answers yes/no questions with either a JSON boolean or 1/0.
fn flag(method: &str, result: &Value) -> Result<bool> {
    match result {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64() == Some(1.0)),
        other => Err(invalid(method, format!("expected a boolean, got {}", other))),
    }
}
