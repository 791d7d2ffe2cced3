use serde::{Deserialize, Serialize};
use std::net::ToSocketAddrs;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "192.168.0.2";
pub const DEFAULT_PORT: u32 = 8055;

/// ```rust,ignore
/// // Create a new configuration with a DNS name or IP address
/// let config = EliteDriverConfig::new("192.168.0.2".to_string(), 8055);
///
/// // Validate the configuration
/// if let Err(e) = config.validate() {
///     println!("Configuration error: {}", e);
///     return;
/// }
///
/// // Resolve the address to a `SocketAddr`
/// match config.resolve() {
///     Ok(resolved_address) => println!("Resolved address: {}", resolved_address),
///     Err(e) => println!("Failed to resolve address: {}", e),
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EliteDriverConfig {
    pub addr: String,
    pub port: u32,
    /// How long the caller waits after switching the servo on before issuing motion.
    pub settle_delay: Duration,
    /// Size of each socket read while assembling a reply line.
    pub recv_buffer_size: usize,
    /// `None` waits on the platform default.
    pub connect_timeout: Option<Duration>,
    /// `None` blocks until the controller answers.
    pub response_timeout: Option<Duration>,
}

impl EliteDriverConfig {
    pub fn new(addr: String, port: u32) -> Self {
        Self {
            addr,
            port,
            ..Default::default()
        }
    }

    /// Defaults overlaid with `ELITE_ROBOT_ADDR`, `ELITE_ROBOT_PORT` and
    /// `ELITE_SETTLE_DELAY_MS`. Unparseable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("ELITE_ROBOT_ADDR") {
            if !addr.is_empty() {
                config.addr = addr;
            }
        }
        if let Some(port) = std::env::var("ELITE_ROBOT_PORT").ok().and_then(|p| p.parse::<u32>().ok()) {
            config.port = port;
        }
        if let Some(ms) = std::env::var("ELITE_SETTLE_DELAY_MS").ok().and_then(|d| d.parse::<u64>().ok()) {
            config.settle_delay = Duration::from_millis(ms);
        }
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.addr.is_empty() {
            return Err("Address cannot be empty.".to_string());
        }
        if self.port == 0 || self.port > u16::MAX as u32 {
            return Err("Port number must be between 1 and 65535.".to_string());
        }
        if self.recv_buffer_size == 0 {
            return Err("Receive buffer size must be greater than 0.".to_string());
        }
        Ok(())
    }

    /// Generates a connection URL from the address and port.
    pub fn connection_url(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    /// Resolves the address to a `SocketAddr` if possible.
    pub fn resolve(&self) -> Result<String, String> {
        resolve_address(&self.addr, self.port)
    }
}

impl Default for EliteDriverConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            port: DEFAULT_PORT,
            settle_delay: Duration::from_secs(1),
            recv_buffer_size: 1024,
            connect_timeout: None,
            response_timeout: None,
        }
    }
}

/// Resolves a DNS name or IP address to a `SocketAddr`.
fn resolve_address(addr: &str, port: u32) -> Result<String, String> {
    let address_with_port = format!("{}:{}", addr, port);
    match address_with_port.to_socket_addrs() {
        Ok(mut iter) => match iter.next() {
            Some(socket_addr) => Ok(socket_addr.to_string()),
            None => Err("Could not resolve address".to_string()),
        },
        Err(_) => Err("Invalid address format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controller_factory_settings() {
        let config = EliteDriverConfig::default();
        assert_eq!(config.connection_url(), "192.168.0.2:8055");
        assert_eq!(config.recv_buffer_size, 1024);
        assert_eq!(config.settle_delay, Duration::from_secs(1));
        assert!(config.response_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EliteDriverConfig::new(String::new(), 8055).validate().is_err());
        assert!(EliteDriverConfig::new("127.0.0.1".to_string(), 0).validate().is_err());
        assert!(EliteDriverConfig::new("127.0.0.1".to_string(), 70000).validate().is_err());

        let mut config = EliteDriverConfig::new("127.0.0.1".to_string(), 8055);
        config.recv_buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolves_loopback() {
        let config = EliteDriverConfig::new("127.0.0.1".to_string(), 8055);
        assert_eq!(config.resolve().unwrap(), "127.0.0.1:8055");
    }
}
