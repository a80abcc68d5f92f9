//! Dumps the visible surface to disk as a PNG image.
//!
//! This is the headless stand-in for a window: point an image viewer that
//! reloads on change at the file and it shows what a browser tab would.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer};
use thiserror::Error;
use tracing::warn;

use gamescreen_core::Canvas;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("surface of {width}x{height} does not match its pixel buffer")]
    BufferSize { width: u32, height: u32 },
    #[error("failed to encode snapshot: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to move snapshot into place at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Saves `canvas` as a PNG at `path`.
///
/// The image goes to a sibling temp file first and is renamed into place,
/// so a viewer never sees a half-written file.
///
/// # Errors
///
/// Returns [`SnapshotError`] if encoding or any file operation fails.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<(), SnapshotError> {
    let (width, height) = (canvas.width(), canvas.height());
    let buffer = ImageBuffer::<image::Rgba<u8>, _>::from_vec(width, height, canvas.as_bytes().to_vec())
        .ok_or(SnapshotError::BufferSize { width, height })?;

    let tmp = path.with_extension("tmp.png");
    DynamicImage::ImageRgba8(buffer).save(&tmp)?;
    std::fs::rename(&tmp, path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes snapshots of the surface to a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copies `canvas` now and encodes it on the blocking pool.  Failures are
    /// logged.
    pub fn write(&self, canvas: &Canvas) {
        let canvas = canvas.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = save_png(&canvas, &path) {
                warn!("failed to write snapshot to {}: {e}", path.display());
            }
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
