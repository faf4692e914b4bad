//! Pure transforms at the message boundary.
//!
//! Nothing in here holds state or touches the network.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `bbox` | Corner and origin-plus-extent boxes |
//! | `frame` | Raw frame buffers |
//! | `jpeg` | Frame compression |

// ============================================================================
// Submodules
// ============================================================================

/// Bounding-box representations.
pub mod bbox;

/// Raw frame buffers.
pub mod frame;

/// JPEG frame compression.
pub mod jpeg;

// ============================================================================
// Re-exports
// ============================================================================

pub use bbox::{XywhBox, XyxyBox, xywh_to_xyxy, xyxy_to_xywh};
pub use frame::{Frame, PixelLayout};
pub use jpeg::{CompressedImage, DEFAULT_QUALITY, encode_frame};
