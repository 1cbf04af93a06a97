//! Configuration for boardwire
//!
//! Centralized client configuration with sensible defaults.

use std::time::Duration;

/// Main configuration for a protocol client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Server host name or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Timeout Configuration (0 disables the deadline)
    // -------------------------------------------------------------------------
    /// Connect timeout per resolved address (milliseconds)
    pub connect_timeout_ms: u64,

    /// Deadline for one complete status line to arrive (milliseconds)
    pub read_timeout_ms: u64,

    /// Deadline for one command to be fully written (milliseconds)
    pub write_timeout_ms: u64,

    /// Read slice used to notice cancellation while blocked (milliseconds)
    pub poll_interval_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Limits
    // -------------------------------------------------------------------------
    /// Max bytes buffered without seeing a newline
    pub max_line_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1312,
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            poll_interval_ms: 50,
            max_line_len: 64 * 1024, // 64 KB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string used for resolution and log messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Poll slice, never zero (sockets reject a zero timeout)
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the cancellation poll interval (in milliseconds)
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Set the maximum line length (in bytes)
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
