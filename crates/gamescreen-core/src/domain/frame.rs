//! Fixed-size RGBA frames pushed by the remote peer.
//!
//! Every binary websocket message carries exactly one frame: 160 x 144
//! pixels, four bytes per pixel (red, green, blue, alpha), row-major with no
//! padding.  A message of any other length is rejected with
//! [`FrameFormatError`] before it can touch the display.

use thiserror::Error;

/// Native frame width in pixels.
pub const FRAME_WIDTH: u32 = 160;

/// Native frame height in pixels.
pub const FRAME_HEIGHT: u32 = 144;

/// Bytes per pixel (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

/// Exact byte length of a valid frame: `160 * 144 * 4 = 92_160`.
pub const FRAME_LEN: usize = FRAME_WIDTH as usize * FRAME_HEIGHT as usize * BYTES_PER_PIXEL;

/// A frame whose byte length does not match [`FRAME_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed frame: expected {expected} bytes, got {actual}")]
pub struct FrameFormatError {
    /// Required length.
    pub expected: usize,
    /// Length actually received.
    pub actual: usize,
}

/// One RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    /// Opaque black.  An all-zero frame is transparent black (alpha 0).
    pub const BLACK: Rgba = Rgba {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0xFF,
    };

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Builds a pixel from a 4-byte RGBA slice.
    ///
    /// Callers guarantee `bytes.len() >= 4`.
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A validated, immutable frame.
///
/// Construction is the only place the length check happens; once a `Frame`
/// exists it is always exactly [`FRAME_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Validates `bytes` and wraps them as a frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameFormatError`] if `bytes.len() != FRAME_LEN`.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FrameFormatError> {
        if bytes.len() != FRAME_LEN {
            return Err(FrameFormatError {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// A frame filled with a single colour.  Handy for tests and benches.
    pub fn solid(pixel: Rgba) -> Self {
        let mut bytes = Vec::with_capacity(FRAME_LEN);
        for _ in 0..(FRAME_WIDTH * FRAME_HEIGHT) {
            bytes.extend_from_slice(&[pixel.red, pixel.green, pixel.blue, pixel.alpha]);
        }
        Self { bytes }
    }

    pub fn width(&self) -> u32 {
        FRAME_WIDTH
    }

    pub fn height(&self) -> u32 {
        FRAME_HEIGHT
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= FRAME_WIDTH || y >= FRAME_HEIGHT {
            return None;
        }
        let offset = (y as usize * FRAME_WIDTH as usize + x as usize) * BYTES_PER_PIXEL;
        Some(Rgba::from_slice(&self.bytes[offset..offset + BYTES_PER_PIXEL]))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_len_is_92160() {
        assert_eq!(FRAME_LEN, 92_160);
    }

    #[test]
    fn test_from_bytes_accepts_exact_length() {
        // Arrange
        let bytes = vec![0u8; FRAME_LEN];

        // Act
        let frame = Frame::from_bytes(bytes).expect("exact length must be accepted");

        // Assert
        assert_eq!(frame.as_bytes().len(), FRAME_LEN);
        assert_eq!(frame.width(), 160);
        assert_eq!(frame.height(), 144);
    }

    #[test]
    fn test_from_bytes_rejects_short_buffer() {
        let err = Frame::from_bytes(vec![0u8; FRAME_LEN - 1]).unwrap_err();
        assert_eq!(err.expected, FRAME_LEN);
        assert_eq!(err.actual, FRAME_LEN - 1);
    }

    #[test]
    fn test_from_bytes_rejects_long_buffer() {
        let err = Frame::from_bytes(vec![0u8; FRAME_LEN + 4]).unwrap_err();
        assert_eq!(err.actual, FRAME_LEN + 4);
    }

    #[test]
    fn test_from_bytes_rejects_empty_buffer() {
        assert!(Frame::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_pixel_reads_row_major_rgba() {
        // Arrange: mark pixel (3, 2) with a distinctive colour
        let mut bytes = vec![0u8; FRAME_LEN];
        let offset = (2 * 160 + 3) * 4;
        bytes[offset..offset + 4].copy_from_slice(&[10, 20, 30, 40]);
        let frame = Frame::from_bytes(bytes).unwrap();

        // Act / Assert
        assert_eq!(frame.pixel(3, 2), Some(Rgba::new(10, 20, 30, 40)));
        assert_eq!(frame.pixel(2, 3), Some(Rgba::default()));
    }

    #[test]
    fn test_all_zero_frame_is_transparent_black() {
        let frame = Frame::from_bytes(vec![0u8; FRAME_LEN]).unwrap();

        assert_eq!(frame.pixel(0, 0), Some(Rgba::new(0, 0, 0, 0)));
        assert_ne!(frame.pixel(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn test_pixel_out_of_bounds_is_none() {
        let frame = Frame::solid(Rgba::BLACK);
        assert_eq!(frame.pixel(160, 0), None);
        assert_eq!(frame.pixel(0, 144), None);
    }

    #[test]
    fn test_error_message_names_both_lengths() {
        let err = Frame::from_bytes(vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed frame: expected 92160 bytes, got 3"
        );
    }
}
