//! Frame dispatch with single-in-flight flow control.

use tracing::{debug, trace};

use crate::codec::{Frame, encode_frame};
use crate::error::Result;

use super::EdgeClient;

// ============================================================================
// EdgeClient - Dispatch
// ============================================================================

impl EdgeClient {
    /// Compresses `frame` and queues it for the detector.
    ///
    /// Returns `Ok(false)` without doing any work while a frame is already
    /// in flight; the caller keeps or drops the frame and tries again after
    /// a reply was received. Returns `Ok(true)` once the frame is queued on
    /// the socket. Never waits for the peer.
    ///
    /// # Errors
    ///
    /// - [`Error::Image`](crate::Error::Image) if compression fails
    /// - [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if the
    ///   socket is gone
    ///
    /// The client stays idle on error.
    pub fn send(&mut self, frame: &Frame) -> Result<bool> {
        if self.in_flight {
            trace!(identity = %self.identity, "Frame rejected, reply outstanding");
            return Ok(false);
        }

        let encoded = encode_frame(frame, self.jpeg_quality)?;
        let bytes = encoded.len();

        self.connection.enqueue(encoded.into_vec())?;
        self.in_flight = true;

        debug!(identity = %self.identity, bytes, "Frame sent");

        Ok(true)
    }
}
