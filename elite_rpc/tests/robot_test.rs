//! Integration tests for the typed robot operations, run against the
//! in-process simulator.

use elite_rpc::{
    drivers::{EliteDriverConfig, Robot},
    RobotMode, RobotState, RpcError, ServoStatus, VariableType, VariableValue,
};
use sim::{SimController, SimState, MODE_OPERATING, MODE_TEACHING};

async fn connected_robot(sim: &SimController) -> Robot {
    let mut robot = Robot::new(EliteDriverConfig::new("127.0.0.1".to_string(), sim.port() as u32));
    robot.connect().await.expect("simulator should accept connections");
    robot
}

#[tokio::test]
async fn test_get_status_maps_run_state() {
    let sim = SimController::start(0).await.unwrap();
    sim.state().lock().await.robot_state = 3;
    let mut robot = connected_robot(&sim).await;

    let status = robot.get_status().await.unwrap();
    assert_eq!(status, RobotState::Running);
    assert_eq!(status.to_string(), "RUNNING");
}

#[tokio::test]
async fn test_get_status_out_of_range_is_a_decode_fault() {
    let sim = SimController::start(0).await.unwrap();
    sim.state().lock().await.robot_state = 6;
    let mut robot = connected_robot(&sim).await;

    match robot.get_status().await {
        Err(RpcError::InvalidResult { method, .. }) => assert_eq!(method, "getRobotState"),
        other => panic!("expected InvalidResult, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_robot_mode() {
    let mut state = SimState::default();
    state.robot_mode = MODE_OPERATING;
    let sim = SimController::start_with_state(0, state).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert_eq!(robot.get_robot_mode().await.unwrap(), RobotMode::Operating);

    sim.state().lock().await.robot_mode = 7;
    assert!(matches!(robot.get_robot_mode().await, Err(RpcError::InvalidResult { .. })));
}

#[tokio::test]
async fn test_collision_detection_round_trip() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert!(!robot.get_collision_status().await.unwrap());
    assert!(robot.set_collision_detection(true).await.unwrap());
    assert!(robot.get_collision_status().await.unwrap());
    assert!(sim.state().lock().await.collision_enable);
}

#[tokio::test]
async fn test_servo_status() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert!(!robot.get_servo_status().await.unwrap());
    assert!(robot.set_servo_status(ServoStatus::On).await.unwrap());
    assert!(robot.get_servo_status().await.unwrap());
    assert!(robot.set_servo_status(false.into()).await.unwrap());
    assert!(!sim.state().lock().await.servo_on);
}

#[tokio::test]
async fn test_variables_use_fixed_method_names() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert!(robot.set_variable(VariableType::SysVarB, 0, 5i64).await.unwrap());
    assert!(robot.set_variable(VariableType::SysVarD, 2, 1.25).await.unwrap());

    assert_eq!(robot.get_variable(VariableType::SysVarB, 0).await.unwrap(), VariableValue::Int(5));
    assert_eq!(robot.get_variable(VariableType::SysVarI, 9).await.unwrap(), VariableValue::Int(0));
    assert_eq!(robot.get_variable(VariableType::SysVarD, 2).await.unwrap(), VariableValue::Double(1.25));

    assert_eq!(
        sim.journal().await,
        vec!["setSysVarB", "setSysVarD", "getSysVarB", "getSysVarI", "getSysVarD"]
    );
}

#[tokio::test]
async fn test_stop_pause_run() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert!(robot.run().await.unwrap());
    assert_eq!(robot.get_status().await.unwrap(), RobotState::Running);
    assert!(robot.pause().await.unwrap());
    assert_eq!(robot.get_status().await.unwrap(), RobotState::Pause);
    assert!(robot.stop_operation().await.unwrap());
    assert_eq!(robot.get_status().await.unwrap(), RobotState::Stop);
}

#[tokio::test]
async fn test_set_speed_is_not_range_checked_locally() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    assert!(robot.set_speed(42.5).await.unwrap());
    assert_eq!(sim.state().lock().await.speed, 42.5);

    // Out of range values reach the controller, which rejects them.
    match robot.set_speed(250.0).await {
        Err(RpcError::Command { method, payload }) => {
            assert_eq!(method, "setSpeed");
            assert_eq!(payload.code, -32602);
        }
        other => panic!("expected controller rejection, got {:?}", other),
    }
    assert_eq!(sim.journal().await, vec!["setSpeed", "setSpeed"]);
}

#[tokio::test]
async fn test_run_jbi_checks_existence_first() {
    let sim = SimController::start(0).await.unwrap();
    sim.state().lock().await.servo_on = true;
    let mut robot = connected_robot(&sim).await;

    assert!(robot.check_jbi_exist("cashify").await.unwrap());
    assert!(robot.run_jbi("cashify").await.unwrap());

    let state = robot.get_jbi_state().await.unwrap();
    assert_eq!(state["jbiName"], "cashify");
    assert_eq!(
        sim.journal().await,
        vec!["checkJbiExist", "checkJbiExist", "runJbi", "getJbiState"]
    );
}

#[tokio::test]
async fn test_run_jbi_missing_file_sends_no_run() {
    let sim = SimController::start(0).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    match robot.run_jbi("ghost").await {
        Err(RpcError::FileNotFound(name)) => assert_eq!(name, "ghost"),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
    assert_eq!(sim.journal().await, vec!["checkJbiExist"]);
}

#[tokio::test]
async fn test_writes_in_teach_mode_need_remote_mode() {
    let mut state = SimState::default();
    state.robot_mode = MODE_TEACHING;
    let sim = SimController::start_with_state(0, state).await.unwrap();
    let mut robot = connected_robot(&sim).await;

    let err = robot.set_collision_detection(true).await.unwrap_err();
    assert!(matches!(err, RpcError::RemoteModeRequired { .. }));
    assert!(err.to_string().contains("Remote Mode"));

    // Reads still work.
    assert_eq!(robot.get_robot_mode().await.unwrap(), RobotMode::Teaching);
}

#[tokio::test]
async fn test_operations_fail_when_not_connected() {
    let mut robot = Robot::new(EliteDriverConfig::new("127.0.0.1".to_string(), 8055));
    assert!(matches!(robot.get_status().await, Err(RpcError::NotConnected)));
    assert!(matches!(robot.run_jbi("cashify").await, Err(RpcError::NotConnected)));
}
