//! Bounding-box representations and conversion.
//!
//! The detector reports corner form (`xyxy`); callers receive origin plus
//! extent (`xywh`). Conversion is plain arithmetic: nothing is clamped and
//! corner ordering is not checked, so `x2 < x1` yields a negative width.

use serde::{Deserialize, Serialize};

// ============================================================================
// XyxyBox
// ============================================================================

/// Corner-form box `[x1, y1, x2, y2]`, as sent by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct XyxyBox {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl XyxyBox {
    /// Creates a corner-form box.
    #[inline]
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns `[x1, y1, x2, y2]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f64; 4]> for XyxyBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<XyxyBox> for [f64; 4] {
    fn from(b: XyxyBox) -> Self {
        b.to_array()
    }
}

// ============================================================================
// XywhBox
// ============================================================================

/// Origin-plus-extent box `[x, y, w, h]`, as delivered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct XywhBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl XywhBox {
    /// Creates an origin-plus-extent box.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `[x, y, w, h]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

impl From<[f64; 4]> for XywhBox {
    fn from([x, y, w, h]: [f64; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl From<XywhBox> for [f64; 4] {
    fn from(b: XywhBox) -> Self {
        b.to_array()
    }
}

impl From<XyxyBox> for XywhBox {
    fn from(b: XyxyBox) -> Self {
        xyxy_to_xywh(b)
    }
}

impl From<XywhBox> for XyxyBox {
    fn from(b: XywhBox) -> Self {
        xywh_to_xyxy(b)
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts corner form to origin-plus-extent form.
#[inline]
#[must_use]
pub fn xyxy_to_xywh(b: XyxyBox) -> XywhBox {
    XywhBox {
        x: b.x1,
        y: b.y1,
        w: b.x2 - b.x1,
        h: b.y2 - b.y1,
    }
}

/// Converts origin-plus-extent form back to corner form.
#[inline]
#[must_use]
pub fn xywh_to_xyxy(b: XywhBox) -> XyxyBox {
    XyxyBox {
        x1: b.x,
        y1: b.y,
        x2: b.x + b.w,
        y2: b.y + b.h,
    }
}

// ============================================================================
// Tests
// ============================================================================
