//! Edge detection client - ships camera frames to a remote detector.
//!
//! This library is the device side of an edge video analytics pipeline:
//! it compresses a captured frame, sends it to a detection server over a
//! message socket, and decodes the server's reply into detections.
//!
//! # Wire Compatibility
//!
//! The message socket is a WebSocket connection (TCP or Unix domain socket)
//! with the client identity in the `x-edge-identity` handshake header. It is
//! not ZeroMQ: a detector must accept WebSocket clients, or sit behind a
//! bridge that does, for this crate to reach it.
//!
//! # Architecture
//!
//! - **Client (Rust)**: Encodes frames to JPEG, sends them, polls for replies
//! - **Detector (remote)**: Runs inference, replies with JSON detections
//!
//! Key design principles:
//!
//! - At most one frame in flight; `send` returns `false` while busy
//! - Each [`EdgeClient`] owns one connection and one identity
//! - Replies are never correlated: the reply belongs to the frame in flight
//! - Receive timeouts are `None`, not errors
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use edge_detect_client::{ClientConfig, EdgeClient, Frame, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = EdgeClient::connect(ClientConfig::local()).await?;
//!
//!     let frame = Frame::from(image::RgbImage::new(640, 480));
//!     if client.send(&frame)? {
//!         if let Some(detections) = client.receive(Duration::from_millis(100)).await? {
//!             println!("{} objects", detections.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`EdgeClient`] and [`ClientConfig`] |
//! | [`codec`] | Frame compression and bounding boxes |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Client identities and generators |
//! | [`protocol`] | Reply decoding and [`Detection`] |
//! | [`transport`] | WebSocket message socket and endpoints |

// ============================================================================
// Modules
// ============================================================================

/// Detector client: connect, send, receive.
pub mod client;

/// Pure transforms: JPEG encoding and bounding-box conversion.
pub mod codec;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Client identities.
pub mod identifiers;

/// Detector message types.
pub mod protocol;

/// Message socket transport.
///
/// WebSocket connection, its event loop, and detector endpoints. Public so
/// callers can drive a [`transport::Connection`] directly or build a
/// compatible peer around [`transport::IDENTITY_HEADER`].
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{ClientConfig, EdgeClient, ProtocolState, TransportKind};

// Codec types
pub use codec::{CompressedImage, Frame, PixelLayout, XywhBox, XyxyBox};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ClientIdentity, IdentityGenerator, SequentialIdentity, UuidIdentity};

// Protocol types
pub use protocol::{Category, Detection};

// Transport types
pub use transport::Endpoint;
