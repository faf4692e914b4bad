//! In-process detector peer for integration tests.
//!
//! Accepts one client, records the identity it announces, hands every
//! received frame to the test, and sends whatever replies the test queues.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use edge_detect_client::transport::IDENTITY_HEADER;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for anything the tests wait on.
pub const WAIT: Duration = Duration::from_secs(2);

// ============================================================================
// FakeDetector
// ============================================================================

/// Test-side handle to the peer.
pub struct FakeDetector {
    identity_rx: Option<oneshot::Receiver<String>>,
    frames_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    replies_tx: Option<mpsc::UnboundedSender<String>>,
}

impl FakeDetector {
    /// Listens on an ephemeral TCP port.
    pub async fn bind_tcp() -> (Self, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (detector, channels) = Self::channels();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            serve(stream, channels).await;
        });

        (detector, addr)
    }

    /// Listens on a Unix socket at `path`.
    #[cfg(unix)]
    pub fn bind_unix(path: &std::path::Path) -> Self {
        let listener = tokio::net::UnixListener::bind(path).unwrap();
        let (detector, channels) = Self::channels();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            serve(stream, channels).await;
        });

        detector
    }

    fn channels() -> (Self, PeerChannels) {
        let (identity_tx, identity_rx) = oneshot::channel();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();

        let detector = Self {
            identity_rx: Some(identity_rx),
            frames_rx,
            replies_tx: Some(replies_tx),
        };

        let channels = PeerChannels {
            identity_tx,
            frames_tx,
            replies_rx,
        };

        (detector, channels)
    }

    /// Returns the identity header the client connected with.
    pub async fn identity(&mut self) -> String {
        let rx = self.identity_rx.take().expect("identity already taken");
        timeout(WAIT, rx).await.unwrap().unwrap()
    }

    /// Waits for the next frame the client sent.
    pub async fn next_frame(&mut self) -> Vec<u8> {
        timeout(WAIT, self.frames_rx.recv())
            .await
            .expect("no frame within timeout")
            .expect("peer stopped")
    }

    /// Asserts the client sends nothing else for `wait`.
    pub async fn assert_no_frame(&mut self, wait: Duration) {
        if let Ok(Some(frame)) = timeout(wait, self.frames_rx.recv()).await {
            panic!("unexpected frame of {} bytes", frame.len());
        }
    }

    /// Queues a raw reply body.
    pub fn reply(&self, body: &str) {
        self.replies_tx
            .as_ref()
            .expect("peer disconnected")
            .send(body.to_string())
            .unwrap();
    }

    /// Drops the socket without a close handshake.
    pub fn disconnect(&mut self) {
        self.replies_tx = None;
    }
}

// ============================================================================
// Peer Task
// ============================================================================

struct PeerChannels {
    identity_tx: oneshot::Sender<String>,
    frames_tx: mpsc::UnboundedSender<Vec<u8>>,
    replies_rx: mpsc::UnboundedReceiver<String>,
}

async fn serve<S>(stream: S, channels: PeerChannels)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let PeerChannels {
        identity_tx,
        frames_tx,
        mut replies_rx,
    } = channels;

    let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let identity = request
            .headers()
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let _ = identity_tx.send(identity);
        Ok(response)
    };

    let ws_stream = tokio_tungstenite::accept_hdr_async(stream, callback)
        .await
        .unwrap();
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Binary(data))) => {
                    let _ = frames_tx.send(data.to_vec());
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },

            reply = replies_rx.recv() => match reply {
                Some(body) => {
                    if write.send(Message::Text(body.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}
