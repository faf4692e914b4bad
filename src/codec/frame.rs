//! Raw video frames handed over by the capture side.

use std::fmt;

use image::{GrayImage, RgbImage, RgbaImage};

use crate::error::{Error, Result};

// ============================================================================
// PixelLayout
// ============================================================================

/// Channel layout of a raw frame buffer, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single luma channel.
    Gray8,
    /// Red, green, blue.
    Rgb8,
    /// Blue, green, red (OpenCV-style capture).
    Bgr8,
    /// Red, green, blue, alpha.
    Rgba8,
    /// Blue, green, red, alpha.
    Bgra8,
}

impl PixelLayout {
    /// Returns the number of bytes per pixel.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

/// A captured frame: tightly packed rows, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    /// Wraps a raw pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFrame`] if a dimension is zero or the buffer
    /// length is not `width * height * channels`.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_frame(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(Error::invalid_frame(format!(
                "{width}x{height} {layout:?} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Returns the frame width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the channel layout.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Returns the raw pixel bytes.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the frame and returns its pixel bytes.
    #[inline]
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgb8,
            data: img.into_raw(),
        }
    }
}

impl From<RgbaImage> for Frame {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgba8,
            data: img.into_raw(),
        }
    }
}

impl From<GrayImage> for Frame {
    fn from(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Gray8,
            data: img.into_raw(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        assert_eq!(PixelLayout::Gray8.channels(), 1);
        assert_eq!(PixelLayout::Bgr8.channels(), 3);
        assert_eq!(PixelLayout::Bgra8.channels(), 4);
    }

    #[test]
    fn test_new_checks_length() {
        assert!(Frame::new(2, 2, PixelLayout::Rgb8, vec![0; 12]).is_ok());

        let err = Frame::new(2, 2, PixelLayout::Rgb8, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvalidFrame { .. }));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Frame::new(0, 4, PixelLayout::Gray8, vec![]).is_err());
    }

    #[test]
    fn test_from_rgb_image() {
        let frame = Frame::from(RgbImage::new(4, 3));
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.layout(), PixelLayout::Rgb8);
        assert_eq!(frame.data().len(), 36);
    }
}
