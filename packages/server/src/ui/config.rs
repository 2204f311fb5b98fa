//! Server configuration.

use std::time::Duration;

use crate::infrastructure::broadcast::DEFAULT_BROADCAST_CAPACITY;

/// Runtime settings for [`Server`](super::Server).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 8888)
    pub port: u16,
    /// A connection with no inbound line for this long is evicted
    pub idle_timeout: Duration,
    /// Capacity of the shared broadcast queue
    pub broadcast_capacity: usize,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8888;
    pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            idle_timeout: Duration::from_secs(Self::DEFAULT_IDLE_TIMEOUT_SECS),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: 既定値は 127.0.0.1:8888、タイムアウト 10 秒
        // given (前提条件):

        // when (操作):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8888);
        assert_eq!(config.idle_timeout, Duration::from_secs(10));
        assert_eq!(config.broadcast_capacity, 1024);
    }
}
