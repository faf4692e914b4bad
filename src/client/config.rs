//! Client configuration.
//!
//! # Example
//!
//! ```ignore
//! use edge_detect_client::{ClientConfig, TransportKind};
//!
//! let config = ClientConfig::local()
//!     .with_local_path("/run/detector.sock")
//!     .with_jpeg_quality(85);
//!
//! // Or from JSON, with unspecified fields left at their defaults:
//! let config = ClientConfig::from_json(r#"{"transport": "network"}"#)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_QUALITY;
use crate::error::{Error, Result};
use crate::transport::{DEFAULT_LOCAL_PATH, DEFAULT_NETWORK_ADDR, Endpoint};

// ============================================================================
// Constants
// ============================================================================

/// Default time allowed for connect plus handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// TransportKind
// ============================================================================

/// Which transport to reach the detector over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Unix domain socket on this machine.
    Local,
    /// TCP.
    #[default]
    Network,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Network => "network",
        })
    }
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Self::Local),
            "network" => Ok(Self::Network),
            other => Err(Error::config(format!(
                "unknown transport {other:?}, expected \"local\" or \"network\""
            ))),
        }
    }
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Connection and encoding settings for an [`EdgeClient`](crate::EdgeClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Transport selection.
    pub transport: TransportKind,

    /// Unix socket path used with [`TransportKind::Local`].
    pub local_path: PathBuf,

    /// `host:port` used with [`TransportKind::Network`].
    pub network_addr: String,

    /// JPEG quality for outgoing frames (1-100).
    pub jpeg_quality: u8,

    /// Connect plus handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            local_path: PathBuf::from(DEFAULT_LOCAL_PATH),
            network_addr: DEFAULT_NETWORK_ADDR.to_string(),
            jpeg_quality: DEFAULT_QUALITY,
            connect_timeout_ms: millis(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientConfig {
    /// Creates a configuration with default settings (network transport).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for the local transport.
    #[inline]
    #[must_use]
    pub fn local() -> Self {
        Self::default().with_transport(TransportKind::Local)
    }

    /// Creates a configuration for the network transport.
    #[inline]
    #[must_use]
    pub fn network() -> Self {
        Self::default().with_transport(TransportKind::Network)
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the document is malformed or has unknown fields
    /// - [`Error::Config`] if a value is out of range
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientConfig {
    /// Sets the transport.
    #[inline]
    #[must_use]
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the Unix socket path for the local transport.
    #[inline]
    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = path.into();
        self
    }

    /// Sets the `host:port` for the network transport.
    #[inline]
    #[must_use]
    pub fn with_network_addr(mut self, addr: impl Into<String>) -> Self {
        self.network_addr = addr.into();
        self
    }

    /// Sets the JPEG quality for outgoing frames.
    #[inline]
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Sets the connect timeout. Durations past `u64::MAX` ms saturate.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = millis(timeout);
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl ClientConfig {
    /// Resolves the endpoint for the selected transport.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match self.transport {
            TransportKind::Local => Endpoint::Local(self.local_path.clone()),
            TransportKind::Network => Endpoint::Network(self.network_addr.clone()),
        }
    }

    /// Returns the connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::config(format!(
                "jpeg_quality must be within 1-100, got {}",
                self.jpeg_quality
            )));
        }

        if self.connect_timeout_ms == 0 {
            return Err(Error::config("connect_timeout_ms must be non-zero"));
        }

        match self.transport {
            TransportKind::Network if self.network_addr.is_empty() => {
                Err(Error::config("network_addr must not be empty"))
            }
            TransportKind::Local if self.local_path.as_os_str().is_empty() => {
                Err(Error::config("local_path must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
