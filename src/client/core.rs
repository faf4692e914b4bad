//! Core client struct, connect, and accessors.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::identifiers::{ClientIdentity, IdentityGenerator, UuidIdentity};
use crate::transport::{Connection, Endpoint};

use super::config::ClientConfig;

// ============================================================================
// ProtocolState
// ============================================================================

/// Flow-control state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolState {
    /// No frame outstanding; `send` will dispatch.
    Idle,
    /// One frame dispatched, reply not yet consumed; `send` returns `false`.
    Busy,
}

// ============================================================================
// EdgeClient
// ============================================================================

/// Client for a remote detector with at most one frame in flight.
///
/// `send` and `receive` take `&mut self`, so a client is driven from one
/// place at a time. Run several clients for parallelism; they share nothing.
pub struct EdgeClient {
    /// Identity announced at connect; never changes.
    pub(crate) identity: ClientIdentity,
    /// Resolved endpoint, for logging and accessors.
    pub(crate) endpoint: Endpoint,
    /// JPEG quality for outgoing frames.
    pub(crate) jpeg_quality: u8,
    /// `true` iff a frame was dispatched and its reply not yet consumed.
    pub(crate) in_flight: bool,
    /// The one transport handle.
    pub(crate) connection: Connection,
}

impl fmt::Debug for EdgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeClient")
            .field("identity", &self.identity)
            .field("endpoint", &self.endpoint)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EdgeClient - Connect
// ============================================================================

impl EdgeClient {
    /// Connects with a random UUID identity.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if the configuration is invalid
    /// - Any connection error from [`Connection::open`]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        Self::connect_with(config, &mut UuidIdentity).await
    }

    /// Connects with an identity taken from `generator`.
    ///
    /// The identity is drawn once, before the socket is opened.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) if the configuration or the
    ///   generated identity is invalid
    /// - Any connection error from [`Connection::open`]
    pub async fn connect_with<G>(config: ClientConfig, generator: &mut G) -> Result<Self>
    where
        G: IdentityGenerator + ?Sized,
    {
        config.validate()?;

        let identity = generator.generate().validated()?;
        let endpoint = config.endpoint();

        debug!(%identity, %endpoint, transport = %config.transport, "Connecting");

        let connection = Connection::open(&endpoint, &identity, config.connect_timeout()).await?;

        Ok(Self {
            identity,
            endpoint,
            jpeg_quality: config.jpeg_quality,
            in_flight: false,
            connection,
        })
    }

    /// Closes the socket and waits for the connection task to stop.
    pub async fn close(self) {
        debug!(identity = %self.identity, "Closing client");
        self.connection.close().await;
    }
}

// ============================================================================
// EdgeClient - Accessors
// ============================================================================

impl EdgeClient {
    /// Returns the client identity.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Returns the detector endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns `true` if a frame is awaiting its reply.
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Returns the flow-control state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ProtocolState {
        if self.in_flight {
            ProtocolState::Busy
        } else {
            ProtocolState::Idle
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::SequentialIdentity;

    #[test]
    fn test_client_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<EdgeClient>();
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_identity() {
        let mut generator = SequentialIdentity::new("bad prefix ");
        let err = EdgeClient::connect_with(ClientConfig::new(), &mut generator)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = ClientConfig::new().with_jpeg_quality(101);
        let err = EdgeClient::connect(config).await.unwrap_err();

        assert!(matches!(err, crate::Error::Config { .. }));
    }
}
