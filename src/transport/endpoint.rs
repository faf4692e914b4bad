//! Detector endpoints.
//!
//! Endpoints print as WebSocket locations (`ws://host:port`,
//! `ws+unix:/path`). They are not ZeroMQ endpoints and cannot address a
//! ZMTP router socket.

use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Constants
// ============================================================================

/// Well-known Unix socket path of a detector on the same machine.
pub const DEFAULT_LOCAL_PATH: &str = "/tmp/edge-server/0";

/// Well-known TCP address of a networked detector.
pub const DEFAULT_NETWORK_ADDR: &str = "127.0.0.1:5555";

// ============================================================================
// Endpoint
// ============================================================================

/// Where the detector listens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Unix domain socket on the local machine.
    Local(PathBuf),
    /// TCP `host:port`.
    Network(String),
}

impl Endpoint {
    /// Returns the WebSocket URL used in the handshake.
    ///
    /// Unix sockets carry no host, so the URL names `localhost`.
    #[must_use]
    pub fn ws_url(&self) -> String {
        match self {
            Self::Local(_) => "ws://localhost/".to_string(),
            Self::Network(addr) => format!("ws://{addr}/"),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::Network(DEFAULT_NETWORK_ADDR.to_string())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "ws+unix:{}", path.display()),
            Self::Network(addr) => write!(f, "ws://{addr}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url() {
        let network = Endpoint::Network("10.0.0.2:5555".into());
        let local = Endpoint::Local(DEFAULT_LOCAL_PATH.into());

        assert_eq!(network.ws_url(), "ws://10.0.0.2:5555/");
        assert_eq!(local.ws_url(), "ws://localhost/");
    }

    #[test]
    fn test_display() {
        let network = Endpoint::default().to_string();
        let local = Endpoint::Local(DEFAULT_LOCAL_PATH.into()).to_string();

        assert_eq!(network, "ws://127.0.0.1:5555");
        assert_eq!(local, "ws+unix:/tmp/edge-server/0");
        assert!(!network.starts_with("tcp://"));
        assert!(!local.starts_with("ipc://"));
    }
}
