//! Reply polling and detection decoding.

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Detection, decode_reply};

use super::EdgeClient;

// ============================================================================
// EdgeClient - Receive
// ============================================================================

impl EdgeClient {
    /// Waits up to `timeout` for the detector's reply.
    ///
    /// Returns `Ok(None)` if nothing arrived; the frame stays in flight and
    /// the caller polls again. Otherwise consumes exactly one message and
    /// returns its detections in the order the detector listed them. An
    /// empty list means nothing was found.
    ///
    /// The in-flight flag is cleared as soon as a message is consumed,
    /// before its body is decoded. A malformed reply therefore still frees
    /// the client for the next `send`.
    ///
    /// A reply arriving while idle is decoded the same way and leaves the
    /// client idle.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the reply body is malformed
    /// - [`Error::ConnectionClosed`] if the socket is gone; the in-flight
    ///   flag is left untouched
    pub async fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<Detection>>> {
        if !self.connection.poll(timeout).await? {
            return Ok(None);
        }

        // poll() buffered a message, so this read cannot come back empty.
        let payload = self
            .connection
            .try_recv()?
            .ok_or_else(|| Error::protocol("message vanished between poll and read"))?;

        self.in_flight = false;

        let detections = decode_reply(&payload)?;

        debug!(
            identity = %self.identity,
            bytes = payload.len(),
            detections = detections.len(),
            "Detections received"
        );

        Ok(Some(detections))
    }
}
