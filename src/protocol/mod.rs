//! Detector message types.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Payload |
//! |---------|-----------|---------|
//! | Frame | Client → Detector | One binary message, JPEG bytes |
//! | Reply | Detector → Client | One text message, JSON `{"detections": [...]}` |
//!
//! There is no request id: at most one frame is outstanding, so a reply
//! always belongs to the frame in flight.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `detection` | Decoded detection types |
//! | `reply` | Reply body decoding |

// ============================================================================
// Submodules
// ============================================================================

/// Decoded detection types.
pub mod detection;

/// Reply body decoding.
pub mod reply;

// ============================================================================
// Re-exports
// ============================================================================

pub use detection::{Category, Detection};
pub use reply::{SCORE_TOLERANCE, decode_reply};
