use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::TransportFault;

/// Owns the one TCP connection to the controller.
///
/// Replies are newline framed. Reads are made in `chunk_size` pieces and
/// accumulated until a full line is available, so replies split across
/// packets or larger than one chunk are reassembled.
#[derive(Debug)]
pub struct Transport {
    stream: TcpStream,
    pending: Vec<u8>,
    chunk_size: usize,
    response_timeout: Option<Duration>,
}

impl Transport {
    pub async fn open(
        addr: &str,
        connect_timeout: Option<Duration>,
        chunk_size: usize,
        response_timeout: Option<Duration>,
    ) -> Result<Self, TransportFault> {
        let connect = TcpStream::connect(addr);
        let stream = match connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| TransportFault::Timeout)?,
            None => connect.await,
        }
        .map_err(|e| TransportFault::Connect(e.to_string()))?;

        // Requests are tiny single lines; don't let Nagle hold them back.
        let _ = stream.set_nodelay(true);

        Ok(Self {
            stream,
            pending: Vec::new(),
            chunk_size: chunk_size.max(1),
            response_timeout,
        })
    }

    pub async fn close(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("socket shutdown: {}", e);
        }
    }

    /// Writes the whole request, then reads until one reply line is complete.
    /// The returned line has its terminator stripped.
    pub async fn send_and_receive(&mut self, bytes: &[u8]) -> Result<Vec<u8>, TransportFault> {
        // Anything still buffered belongs to an earlier exchange.
        self.pending.clear();

        self.stream
            .write_all(bytes)
            .await
            .map_err(|e| TransportFault::Send(e.to_string()))?;

        let response_timeout = self.response_timeout;
        match response_timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_line())
                .await
                .map_err(|_| TransportFault::Timeout)?,
            None => self.read_line().await,
        }
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, TransportFault> {
        let mut buf = vec![0; self.chunk_size];
        loop {
            if let Some(line) = extract_line(&mut self.pending) {
                return Ok(line);
            }
            let n = self
                .stream
                .read(&mut buf)
                .await
                .map_err(|e| TransportFault::Receive(e.to_string()))?;
            if n == 0 {
                return Err(TransportFault::Closed);
            }
            self.pending.extend_from_slice(&buf[..n]);
        }
    }
}

/// Removes the first complete line from `buffer`, without its `\n` or `\r\n`.
/// Blank lines are skipped.
fn extract_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let mut line = buffer.drain(..=pos).collect::<Vec<_>>();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            return Some(line);
        }
    }
    None
}
