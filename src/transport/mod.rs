//! Message socket transport.
//!
//! Frames and replies travel as WebSocket messages over either a Unix
//! domain socket (detector on the same machine) or TCP.
//!
//! The wire protocol is WebSocket (RFC 6455), not ZeroMQ. A detector that
//! only exposes a ZMTP router socket cannot talk to this client directly;
//! it needs a WebSocket front end that routes by the identity header.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  EdgeClient     │                              │  Detector       │
//! │                 │         WebSocket            │                 │
//! │  Connection     │─── frame (binary JPEG) ─────►│  routes replies │
//! │  (event loop)   │◄── reply (JSON text) ────────│  by identity    │
//! └─────────────────┘   ws+unix: or ws://          └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - Connect, handshake with `x-edge-identity` header
//! 2. `Connection::enqueue` - Queue outgoing frames
//! 3. `Connection::poll` / `Connection::try_recv` - Read replies
//! 4. `Connection::close` - Close socket (also on drop)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Socket handle and event loop |
//! | `endpoint` | Local and network endpoints |

// ============================================================================
// Submodules
// ============================================================================

/// Socket handle and event loop.
pub mod connection;

/// Detector endpoints.
pub mod endpoint;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, IDENTITY_HEADER};
pub use endpoint::{DEFAULT_LOCAL_PATH, DEFAULT_NETWORK_ADDR, Endpoint};
