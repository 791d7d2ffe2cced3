use std::error::Error;
use std::sync::Arc;

use sim::{serve, SimState, MODE_TEACHING};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let port = args
        .iter()
        .position(|a| a == "--port")
        .and_then(|i| args.get(i + 1))
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8055);

    // --teach starts with the pendant holding control, so writes are refused.
    let mut state = SimState::default();
    if args.iter().any(|a| a == "--teach") {
        state.robot_mode = MODE_TEACHING;
    }

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Simulated controller listening on {}", listener.local_addr()?);
    serve(listener, Arc::new(Mutex::new(state))).await;
    Ok(())
}
