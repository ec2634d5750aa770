use std::time::Duration;

use crate::error::{Result, SessionError};
use crate::retry::RetryPolicy;

/// Environment variable naming the remote host.
pub const ENV_SOCKET_HOST: &str = "SOCKET_HOST";
/// Environment variable naming the remote port. Required.
pub const ENV_SOCKET_PORT: &str = "SOCKET_PORT";

/// Default remote host when `SOCKET_HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Bound on one readiness wait in the listening loop.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause after each full listener iteration.
pub const DEFAULT_IDLE_PAUSE: Duration = Duration::from_millis(100);

/// Connection parameters for a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host.
    pub host: String,
    /// Remote port.
    pub port: u16,
    /// Reconnect budget and backoff.
    pub retry: RetryPolicy,
    /// Bound on one readiness wait; keeps the read loop interruptible.
    pub wait_timeout: Duration,
    /// Pause after each full listener iteration.
    pub idle_pause: Duration,
}

impl SessionConfig {
    /// Config for an explicit host and port, defaults elsewhere.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            retry: RetryPolicy::default(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            idle_pause: DEFAULT_IDLE_PAUSE,
        }
    }

    /// Config from the environment: `SOCKET_HOST` (default `0.0.0.0`) and
    /// `SOCKET_PORT` (required).
    pub fn from_env() -> Result<Self> {
        let host = std::env::var(ENV_SOCKET_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var(ENV_SOCKET_PORT)
            .map_err(|_| SessionError::InvalidConfig(format!("{ENV_SOCKET_PORT} is not set")))?;
        let port = port.parse::<u16>().map_err(|_| {
            SessionError::InvalidConfig(format!("{ENV_SOCKET_PORT} is not a port number: {port:?}"))
        })?;
        Ok(Self::new(host, port))
    }
}
