use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::SimState;

/// A simulated controller listening on a local port.
///
/// The accept loop runs on a background task that is aborted when the
/// controller is dropped.
pub struct SimController {
    local_addr: SocketAddr,
    state: Arc<Mutex<SimState>>,
    task: JoinHandle<()>,
}

impl SimController {
    /// Binds `127.0.0.1:port`; port 0 picks a free one.
    pub async fn start(port: u16) -> std::io::Result<Self> {
        Self::start_with_state(port, SimState::default()).await
    }

    pub async fn start_with_state(port: u16, state: SimState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let local_addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(state));

        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            serve(listener, shared).await;
        });

        Ok(Self {
            local_addr,
            state,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn state(&self) -> Arc<Mutex<SimState>> {
        Arc::clone(&self.state)
    }

    pub async fn journal(&self) -> Vec<String> {
        self.state.lock().await.journal.clone()
    }
}

impl Drop for SimController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Accepts connections forever, one task per client.
pub async fn serve(listener: TcpListener, state: Arc<Mutex<SimState>>) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Client connected from {}", peer);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, state).await {
                warn!("Error handling client {}: {:?}", peer, e);
            }
            info!("Client {} disconnected", peer);
        });
    }
}

async fn handle_client(
    mut socket: TcpStream,
    state: Arc<Mutex<SimState>>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut buffer = vec![0; 1024];
    let mut temp_buffer = Vec::new();

    loop {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        temp_buffer.extend_from_slice(&buffer[..n]);

        while let Some(pos) = temp_buffer.iter().position(|&x| x == b'\n') {
            let request: Vec<u8> = temp_buffer.drain(..=pos).collect();
            let request = String::from_utf8_lossy(&request[..request.len() - 1]);
            let request = request.trim();
            if request.is_empty() {
                continue;
            }
            debug!("received: {}", request);

            let (reply, split) = {
                let mut state = state.lock().await;
                (state.handle_line(request), state.split_replies)
            };
            debug!("reply: {}", reply);

            let reply = reply + "\n";
            if split {
                let (head, tail) = reply.as_bytes().split_at(reply.len() / 2);
                socket.write_all(head).await?;
                socket.flush().await?;
                tokio::time::sleep(Duration::from_millis(20)).await;
                socket.write_all(tail).await?;
            } else {
                socket.write_all(reply.as_bytes()).await?;
            }
        }
    }

    Ok(())
}
