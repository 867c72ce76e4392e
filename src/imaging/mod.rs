//! Image processing: pure Rust decoding and resizing, libwebp encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Fit** | [`calculate_fit_dimensions`], shrink-only |
//! | **Resize** | Lanczos3 |
//! | **Encode** | `webp::Encoder`, lossy |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Skip-if-present logic on top of the backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use operations::{ThumbnailConfig, ThumbnailOutcome, ensure_thumbnail};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
