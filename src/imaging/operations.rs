//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They decide
//! whether a thumbnail needs to be produced at all, and only then hand a
//! parameter set to the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    /// Bound on both sides of the thumbnail, in pixels.
    pub max_size: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_size: 500,
            quality: Quality::default(),
        }
    }
}

/// What [`ensure_thumbnail`] did for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// A file already exists at the output path; nothing was touched.
    Existing,
    /// The source image is not on disk; nothing was written.
    SourceMissing,
    /// A thumbnail was encoded with these dimensions.
    Generated(Dimensions),
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(source: &Path, output: &Path, config: &ThumbnailConfig) -> ThumbnailParams {
    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        max_size: config.max_size,
        quality: config.quality,
    }
}

/// Create a thumbnail unless one is already there.
///
/// Idempotent by path: an existing output file is never regenerated, whatever
/// its contents. A missing source is not an error.
pub fn ensure_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ThumbnailConfig,
) -> Result<ThumbnailOutcome> {
    if output.exists() {
        return Ok(ThumbnailOutcome::Existing);
    }
    if !source.exists() {
        return Ok(ThumbnailOutcome::SourceMissing);
    }

    let params = plan_thumbnail(source, output, config);
    let dims = backend.thumbnail(&params)?;
    Ok(ThumbnailOutcome::Generated(dims))
}
