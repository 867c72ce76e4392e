//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between deciding *whether* a
//! thumbnail is needed and doing the pixel work. The production implementation
//! is [`RustBackend`](super::rust_backend::RustBackend); tests use a recording
//! mock so the builder can be exercised without decoding or encoding anything.

use super::params::ThumbnailParams;
use thiserror::Error;

/// Failure while opening, converting, resizing or encoding one image.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode the source, shrink it to fit the bound, encode it to the output.
    ///
    /// Returns the dimensions of the written thumbnail.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError>;
}
