//! The display surface and the frame rendering pipeline.
//!
//! [`Canvas`] models a 2-D drawing surface with the semantics the renderer
//! relies on:
//!
//! - `resize` discards the contents (all pixels become transparent black) and
//!   resets the scale transform to identity.
//! - `put_image` writes raw pixels at the origin and ignores the transform.
//! - `draw_canvas` copies another canvas through the current transform using
//!   nearest-neighbour sampling, so an integer upscale is pixel-exact.
//!
//! [`FrameRenderer`] paints a [`Frame`] in two steps: first at native
//! resolution, then blitted 4x onto the same surface.

use crate::domain::frame::{Frame, Rgba, BYTES_PER_PIXEL, FRAME_HEIGHT, FRAME_WIDTH};

/// Integer upscale factor applied to every frame.
pub const SCALE: u32 = 4;

/// Visible surface width after the upscale (640).
pub const SCALED_WIDTH: u32 = FRAME_WIDTH * SCALE;

/// Visible surface height after the upscale (576).
pub const SCALED_HEIGHT: u32 = FRAME_HEIGHT * SCALE;

/// An RGBA drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Current transform; `1` is identity.  Replaced, never accumulated.
    scale: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The scale transform currently in effect.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        Some(Rgba::from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]))
    }

    /// Changes the surface size.  Contents are cleared and the transform is
    /// reset, even when the size does not change.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.scale = 1;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize * BYTES_PER_PIXEL, 0);
    }

    /// Sets the scale transform.  A factor of zero is treated as one.
    pub fn set_scale(&mut self, factor: u32) {
        self.scale = factor.max(1);
    }

    /// Writes `frame` at the origin, clipped to the surface.  The transform
    /// does not apply.
    pub fn put_image(&mut self, frame: &Frame) {
        let rows = frame.height().min(self.height) as usize;
        let cols = frame.width().min(self.width) as usize;
        let src_stride = frame.width() as usize * BYTES_PER_PIXEL;
        let row_bytes = cols * BYTES_PER_PIXEL;

        for y in 0..rows {
            let src = &frame.as_bytes()[y * src_stride..y * src_stride + row_bytes];
            let dst_start = self.offset(0, y as u32);
            self.pixels[dst_start..dst_start + row_bytes].copy_from_slice(src);
        }
    }

    /// Draws `source` at the origin through the current transform.
    ///
    /// Every destination pixel inside the scaled source rectangle takes the
    /// value of the source pixel it maps back to (`dx / scale`, `dy / scale`).
    /// No interpolation, no blending.
    pub fn draw_canvas(&mut self, source: &Canvas) {
        let scale = self.scale;
        let dst_w = (source.width * scale).min(self.width);
        let dst_h = (source.height * scale).min(self.height);

        for dy in 0..dst_h {
            let sy = dy / scale;
            for dx in 0..dst_w {
                let sx = dx / scale;
                let src = source.offset(sx, sy);
                let dst = self.offset(dx, dy);
                self.pixels[dst..dst + BYTES_PER_PIXEL]
                    .copy_from_slice(&source.pixels[src..src + BYTES_PER_PIXEL]);
            }
        }
    }

    /// Overwrites this canvas with a copy of `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Canvas) {
        self.width = other.width;
        self.height = other.height;
        self.scale = other.scale;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

impl Default for Canvas {
    /// A blank surface at the scaled display size.
    fn default() -> Self {
        Self::new(SCALED_WIDTH, SCALED_HEIGHT)
    }
}

/// Paints frames onto a visible [`Canvas`] at [`SCALE`]x.
///
/// Per frame the visible surface is:
///
/// 1. resized to native 160x144 (clearing it and resetting its transform),
/// 2. painted with the raw frame,
/// 3. captured into the renderer's off-screen native buffer,
/// 4. resized to 640x576 (clearing it and resetting its transform again),
/// 5. given a fresh 4x scale transform,
/// 6. drawn from the off-screen buffer with nearest-neighbour sampling.
///
/// Because step 4 resets the transform, step 5 never compounds with the
/// previous frame's scale.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    native: Canvas,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self {
            native: Canvas::new(FRAME_WIDTH, FRAME_HEIGHT),
        }
    }

    /// Renders `frame` onto `surface`.
    pub fn render(&mut self, frame: &Frame, surface: &mut Canvas) {
        surface.resize(FRAME_WIDTH, FRAME_HEIGHT);
        surface.put_image(frame);
        self.native.copy_from(surface);

        surface.resize(surface.width() * SCALE, surface.height() * SCALE);
        surface.set_scale(SCALE);
        surface.draw_canvas(&self.native);
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
