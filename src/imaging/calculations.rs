//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions of an image shrunk to fit inside a square bound.
///
/// Aspect ratio is preserved and images are never upscaled: if both sides
/// already fit, the original dimensions are returned unchanged. Each side is
/// rounded to the nearest pixel and never drops below 1.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `max_size` - Maximum allowed size for either side
///
/// # Returns
/// * `(width, height)` - Fitted dimensions
///
/// # Examples
/// ```
/// # use gallery_thumbs::imaging::calculate_fit_dimensions;
/// // Landscape 2000x1500 into 500 → 500x375
/// assert_eq!(calculate_fit_dimensions((2000, 1500), 500), (500, 375));
///
/// // Already small → unchanged
/// assert_eq!(calculate_fit_dimensions((320, 240), 500), (320, 240));
/// ```
pub fn calculate_fit_dimensions(original: (u32, u32), max_size: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;

    if orig_w <= max_size && orig_h <= max_size {
        return original;
    }

    let scale = f64::min(
        max_size as f64 / orig_w as f64,
        max_size as f64 / orig_h as f64,
    );

    let w = ((orig_w as f64 * scale).round() as u32).clamp(1, max_size);
    let h = ((orig_h as f64 * scale).round() as u32).clamp(1, max_size);
    (w, h)
}
