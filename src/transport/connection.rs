//! Message socket to the detector.
//!
//! A [`Connection`] is the one transport handle a client owns. Opening it
//! performs the WebSocket handshake with the client identity attached, then
//! spawns a tokio task that owns the socket.
//!
//! # Event Loop
//!
//! The task handles:
//!
//! - Outgoing frames queued by [`Connection::enqueue`]
//! - Incoming replies, buffered until [`Connection::poll`] picks them up
//! - Orderly close on shutdown
//!
//! Messages are never correlated: one WebSocket message is one protocol
//! message.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, error, info, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::ClientIdentity;

use super::endpoint::Endpoint;

// ============================================================================
// Constants
// ============================================================================

/// Handshake header carrying the client identity.
pub const IDENTITY_HEADER: &str = "x-edge-identity";

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send one binary message.
    Send(Vec<u8>),
    /// Close the socket and stop.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Identity-addressed message socket to the detector.
///
/// Not `Clone`: exactly one owner per client.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Replies forwarded by the event loop.
    incoming_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Message taken off the channel by `poll` but not yet read.
    ready: Option<Vec<u8>>,
    /// Event loop task.
    task: Option<JoinHandle<()>>,
}

impl Connection {
    /// Opens the transport to `endpoint` and announces `identity`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the handshake does not finish in time
    /// - [`Error::Connection`] if the socket cannot be opened
    /// - [`Error::WebSocket`] if the peer rejects the handshake
    pub async fn open(
        endpoint: &Endpoint,
        identity: &ClientIdentity,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let request = handshake_request(endpoint, identity)?;

        let connection = timeout(connect_timeout, establish(endpoint, request))
            .await
            .map_err(|_| Error::connection_timeout(connect_timeout))??;

        info!(%endpoint, %identity, "Connected to detector");

        Ok(connection)
    }

    /// Wraps an established WebSocket and spawns its event loop.
    pub(crate) fn new<S>(ws_stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(Self::run_event_loop(ws_stream, command_rx, incoming_tx));

        Self {
            command_tx,
            incoming_rx,
            ready: None,
            task: Some(task),
        }
    }

    /// Queues one binary message for sending.
    ///
    /// Returns as soon as the event loop has the message; delivery to the
    /// peer is not awaited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has stopped.
    pub fn enqueue(&self, payload: Vec<u8>) -> Result<()> {
        self.command_tx
            .send(ConnectionCommand::Send(payload))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Waits up to `wait` for an incoming message.
    ///
    /// Returns `true` once a message is ready for [`try_recv`](Self::try_recv).
    /// The message stays buffered until read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the socket is gone and nothing
    /// is left to read.
    pub async fn poll(&mut self, wait: Duration) -> Result<bool> {
        if self.ready.is_some() {
            return Ok(true);
        }

        match timeout(wait, self.incoming_rx.recv()).await {
            Ok(Some(message)) => {
                self.ready = Some(message);
                Ok(true)
            }
            Ok(None) => Err(Error::ConnectionClosed),
            Err(_) => Ok(false),
        }
    }

    /// Reads one message without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the socket is gone and nothing
    /// is left to read.
    pub fn try_recv(&mut self) -> Result<Option<Vec<u8>>> {
        if let Some(message) = self.ready.take() {
            return Ok(Some(message));
        }

        match self.incoming_rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::ConnectionClosed),
        }
    }

    /// Asks the event loop to close the socket.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Closes the socket and waits for the event loop to finish.
    pub async fn close(mut self) {
        self.shutdown();

        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Event loop task failed");
        }
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        incoming_tx: mpsc::UnboundedSender<Vec<u8>>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Replies from the detector
                message = ws_read.next() => {
                    let payload = match message {
                        Some(Ok(Message::Text(text))) => text.as_str().as_bytes().to_vec(),
                        Some(Ok(Message::Binary(data))) => data.to_vec(),

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Ping, Pong, Frame
                        _ => continue,
                    };

                    trace!(bytes = payload.len(), "Message received");

                    if incoming_tx.send(payload).is_err() {
                        debug!("Receiver dropped");
                        break;
                    }
                }

                // Frames from the client
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(payload)) => {
                            let bytes = payload.len();
                            if let Err(e) = ws_write.send(Message::Binary(payload.into())).await {
                                warn!(error = %e, "Failed to send message");
                                break;
                            }
                            trace!(bytes, "Message sent");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        debug!("Event loop terminated");
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("ready", &self.ready.as_ref().map(Vec::len))
            .field("open", &!self.command_tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Handshake
// ============================================================================

/// Builds the handshake request for `endpoint` with the identity header set.
fn handshake_request(endpoint: &Endpoint, identity: &ClientIdentity) -> Result<Request> {
    let mut request = endpoint.ws_url().into_client_request()?;

    let value = HeaderValue::from_str(identity.as_str())
        .map_err(|e| Error::config(format!("identity is not a valid header value: {e}")))?;
    request.headers_mut().insert(IDENTITY_HEADER, value);

    Ok(request)
}

/// Opens the raw stream for `endpoint` and runs the client handshake on it.
async fn establish(endpoint: &Endpoint, request: Request) -> Result<Connection> {
    match endpoint {
        Endpoint::Network(addr) => {
            let stream = TcpStream::connect(addr.as_str())
                .await
                .map_err(|e| Error::connection(format!("{endpoint}: {e}")))?;
            stream.set_nodelay(true)?;

            let (ws_stream, _) = tokio_tungstenite::client_async(request, stream).await?;
            Ok(Connection::new(ws_stream))
        }

        #[cfg(unix)]
        Endpoint::Local(path) => {
            let stream = tokio::net::UnixStream::connect(path)
                .await
                .map_err(|e| Error::connection(format!("{endpoint}: {e}")))?;

            let (ws_stream, _) = tokio_tungstenite::client_async(request, stream).await?;
            Ok(Connection::new(ws_stream))
        }

        #[cfg(not(unix))]
        Endpoint::Local(_) => Err(Error::config(
            "local transport needs Unix domain sockets on this platform",
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    #[test]
    fn test_handshake_request_carries_identity() {
        let endpoint = Endpoint::Network("127.0.0.1:5555".into());
        let identity = ClientIdentity::new("edge-3").unwrap();

        let request = handshake_request(&endpoint, &identity).unwrap();

        assert_eq!(request.uri(), "ws://127.0.0.1:5555/");
        assert_eq!(request.headers()[IDENTITY_HEADER], "edge-3");
    }

    #[tokio::test]
    async fn test_open_refused() {
        // Bind then drop to get a port with no listener.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Endpoint::Network(addr.to_string());
        let identity = ClientIdentity::new("edge-0").unwrap();

        let result = Connection::open(&endpoint, &identity, Duration::from_secs(2)).await;
        assert!(result.unwrap_err().is_connection_error());
    }

    #[tokio::test]
    async fn test_debug_output() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let _ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let endpoint = Endpoint::Network(addr.to_string());
        let identity = ClientIdentity::new("edge-0").unwrap();
        let connection = Connection::open(&endpoint, &identity, Duration::from_secs(2))
            .await
            .unwrap();

        let debug = format!("{connection:?}");
        assert!(debug.starts_with("Connection {"));
        assert!(debug.contains("ready: None"));

        connection.close().await;
    }

    #[tokio::test]
    async fn test_open_times_out_without_handshake() {
        // Listener accepts at the TCP level but never answers the upgrade.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint::Network(listener.local_addr().unwrap().to_string());
        let identity = ClientIdentity::new("edge-0").unwrap();

        let result = Connection::open(&endpoint, &identity, Duration::from_millis(100)).await;
        assert!(matches!(
            result,
            Err(Error::ConnectionTimeout { timeout_ms: 100 })
        ));

        drop(listener);
    }
}
