mod bootstrap;

use elite_rpc::{
    drivers::{EliteDriverConfig, Robot},
    RpcError,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bootstrap::bootstrap;

#[tokio::main]
async fn main() -> Result<(), RpcError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EliteDriverConfig::from_env();
    let program = std::env::var("ELITE_JBI_FILE").unwrap_or_else(|_| "cashify".to_string());

    info!("Connecting to {}...", config.connection_url());
    let mut robot = Robot::new(config.clone());
    match robot.connect().await {
        Ok(message) => info!("{}", message),
        Err(e) => {
            error!("Failed to connect to {}: {}", config.connection_url(), e);
            return Err(e);
        }
    }

    info!("Robot status: {}", robot.get_status().await?);
    info!("Robot mode: {}", robot.get_robot_mode().await?);
    info!("Collision detection enabled: {}", robot.get_collision_status().await?);

    let result = bootstrap(&mut robot, &program, config.settle_delay).await;
    match result {
        Ok(ref report) => info!("Bootstrap finished: {:?}", report),
        Err(ref e) => error!("Bootstrap failed: {}", e),
    }

    info!("{}", robot.disconnect().await);
    result.map(|_| ())
}
