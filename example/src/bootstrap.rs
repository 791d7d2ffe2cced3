use std::time::Duration;

use elite_rpc::{drivers::Robot, RpcError, ServoStatus, VariableType};
use tokio::time::sleep;
use tracing::{info, warn};

/// System variable the barcode reader's handshake lives in.
pub const BARCODE_VAR: (VariableType, u32) = (VariableType::SysVarB, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    pub servo_switched_on: bool,
    pub program_started: bool,
}

/// Brings a freshly connected robot into production: servo on, program
/// running, barcode flag cleared.
///
/// A missing program is not an error; the report says nothing was started.
pub async fn bootstrap(
    robot: &mut Robot,
    program: &str,
    settle_delay: Duration,
) -> Result<BootstrapReport, RpcError> {
    let mut report = BootstrapReport {
        servo_switched_on: false,
        program_started: false,
    };

    if !robot.get_servo_status().await? {
        info!("Servo is off, switching it on");
        robot.set_servo_status(ServoStatus::On).await?;
        report.servo_switched_on = true;
        sleep(settle_delay).await;
    }

    let started = match robot.run_jbi(program).await {
        Ok(started) => started,
        Err(RpcError::FileNotFound(_)) => {
            warn!("Program {} is not on the controller, nothing started", program);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };
    info!("Program {} run status: {}", program, started);
    report.program_started = started;

    let (kind, addr) = BARCODE_VAR;
    let previous = robot.get_variable(kind, addr).await?;
    info!("Barcode variable was {:?}, resetting to 0", previous);
    robot.set_variable(kind, addr, 0i64).await?;

    Ok(report)
}
