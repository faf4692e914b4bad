//! JPEG compression of raw frames.

use std::borrow::Cow;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::trace;

use crate::error::Result;

use super::frame::{Frame, PixelLayout};

// ============================================================================
// Constants
// ============================================================================

/// Quality the detector expects frames at.
pub const DEFAULT_QUALITY: u8 = 90;

// ============================================================================
// CompressedImage
// ============================================================================

/// A JPEG-encoded frame held in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage(Vec<u8>);

impl CompressedImage {
    /// Returns the encoded bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the encoded size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the image and returns the buffer.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Compresses a frame to JPEG.
///
/// `quality` is on the usual 1..=100 scale and is clamped into it. Output
/// depends only on the frame and the quality.
///
/// # Errors
///
/// Returns [`Error::Image`](crate::Error::Image) if the encoder rejects the
/// frame.
pub fn encode_frame(frame: &Frame, quality: u8) -> Result<CompressedImage> {
    let quality = quality.clamp(1, 100);
    let (pixels, color) = encoder_input(frame);

    let mut buf = Vec::with_capacity(frame.data().len() / 8);
    JpegEncoder::new_with_quality(&mut buf, quality).encode(
        &pixels,
        frame.width(),
        frame.height(),
        color,
    )?;

    trace!(
        width = frame.width(),
        height = frame.height(),
        quality,
        bytes = buf.len(),
        "Frame encoded"
    );

    Ok(CompressedImage(buf))
}

/// Maps a frame onto a layout the JPEG encoder accepts.
///
/// Gray and RGB pass through borrowed; everything else is repacked to RGB.
fn encoder_input(frame: &Frame) -> (Cow<'_, [u8]>, ExtendedColorType) {
    let data = frame.data();
    match frame.layout() {
        PixelLayout::Gray8 => (Cow::Borrowed(data), ExtendedColorType::L8),
        PixelLayout::Rgb8 => (Cow::Borrowed(data), ExtendedColorType::Rgb8),
        PixelLayout::Bgr8 => (repack(data, 3, [2, 1, 0]), ExtendedColorType::Rgb8),
        PixelLayout::Rgba8 => (repack(data, 4, [0, 1, 2]), ExtendedColorType::Rgb8),
        PixelLayout::Bgra8 => (repack(data, 4, [2, 1, 0]), ExtendedColorType::Rgb8),
    }
}

/// Picks three channels out of each `stride`-byte pixel.
fn repack(data: &[u8], stride: usize, order: [usize; 3]) -> Cow<'static, [u8]> {
    let mut out = Vec::with_capacity(data.len() / stride * 3);
    for px in data.chunks_exact(stride) {
        out.extend(order.iter().map(|&i| px[i]));
    }
    Cow::Owned(out)
}

// ============================================================================
// Tests
// ============================================================================
