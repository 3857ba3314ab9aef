//! Server configuration.
//!
//! All behaviour is controlled through [`ServerConfig`], built via its
//! [`ServerConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share across handlers, serialise for logging, and diff two
//! deployments to understand why they behave differently.

use crate::error::TextpressError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Configuration for the textpress server.
///
/// Built via [`ServerConfig::builder()`] or [`ServerConfig::default()`].
///
/// # Example
/// ```rust
/// use textpress::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .port(8080)
///     .max_upload_bytes(10 * 1024 * 1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// TCP port. Default: 5000. The CLI also honours the `PORT` environment
    /// variable, the one piece of environment configuration the server has.
    pub port: u16,

    /// Directory where uploads are staged between save and extraction.
    /// Created at startup if absent. Default: `$TMPDIR/textpress`.
    ///
    /// Files in here live only for the duration of a single request and are
    /// named with random identifiers, so concurrent uploads of the same
    /// filename never collide and user input never becomes a path component.
    pub scratch_dir: PathBuf,

    /// Maximum accepted upload size in bytes. Default: 25 MiB.
    ///
    /// Enforced at the HTTP layer before any bytes touch the scratch
    /// directory. Whisper-suitable WAV clips and text-layer PDFs both fit
    /// comfortably; raise it for long recordings.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            scratch_dir: std::env::temp_dir().join("textpress"),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create a new builder for `ServerConfig`.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The socket address the server binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn bind_addr(mut self, addr: IpAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = dir.into();
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServerConfig, TextpressError> {
        let c = &self.config;
        if c.port == 0 {
            return Err(TextpressError::InvalidConfig(
                "Port must be non-zero".into(),
            ));
        }
        if c.max_upload_bytes < 1024 {
            return Err(TextpressError::InvalidConfig(format!(
                "max_upload_bytes must be at least 1024, got {}",
                c.max_upload_bytes
            )));
        }
        if c.scratch_dir.as_os_str().is_empty() {
            return Err(TextpressError::InvalidConfig(
                "scratch_dir must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_all_interfaces_on_5000() {
        let c = ServerConfig::default();
        assert_eq!(c.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn builder_overrides_port_and_limit() {
        let c = ServerConfig::builder()
            .port(8080)
            .max_upload_bytes(2048)
            .build()
            .unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.max_upload_bytes, 2048);
    }

    #[test]
    fn zero_port_is_rejected() {
        let err = ServerConfig::builder().port(0).build().unwrap_err();
        assert!(err.to_string().contains("Port"));
    }

    #[test]
    fn tiny_upload_limit_is_rejected() {
        let err = ServerConfig::builder()
            .max_upload_bytes(10)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_upload_bytes"));
    }
}
