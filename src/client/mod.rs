//! Detector client.
//!
//! An [`EdgeClient`] owns one connection and cycles between two states:
//!
//! ```text
//!          send() -> true
//!   Idle ──────────────────► Busy
//!    ▲                        │  send() -> false
//!    └────────────────────────┘
//!      receive() -> Some(..)
//! ```
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Transport and encoding settings |
//! | `core` | Client struct, connect, accessors |
//! | `dispatch` | Frame sending |
//! | `receive` | Reply polling and decoding |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use edge_detect_client::{ClientConfig, EdgeClient, Frame, PixelLayout};
//!
//! # async fn example(pixels: Vec<u8>) -> edge_detect_client::Result<()> {
//! let mut client = EdgeClient::connect(ClientConfig::network()).await?;
//! let frame = Frame::new(640, 480, PixelLayout::Bgr8, pixels)?;
//!
//! client.send(&frame)?;
//! loop {
//!     if let Some(detections) = client.receive(Duration::from_millis(50)).await? {
//!         for d in &detections {
//!             println!("{} {:.2} {:?}", d.category(), d.score(), d.bbox());
//!         }
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod config;
mod core;
mod dispatch;
mod receive;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, TransportKind};
pub use self::core::{EdgeClient, ProtocolState};
