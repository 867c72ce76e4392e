//! Shared test utilities: real image fixtures and manifest files.
//!
//! Images are drawn with the `image` crate at test time rather than checked in,
//! so tests can ask for exact dimensions.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::Value;
use std::path::Path;

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

/// Write an RGB gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Write a half-transparent RGBA PNG of the given size.
pub fn write_png_rgba(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([200, 40, 40, alpha])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Write a palette-based GIF of the given size: four color bands.
pub fn write_gif(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    const BANDS: [[u8; 3]; 4] = [[220, 30, 30], [30, 220, 30], [30, 30, 220], [240, 240, 240]];
    let img = RgbImage::from_fn(width, height, |x, _| {
        Rgb(BANDS[(x * 4 / width.max(1)) as usize % 4])
    });
    img.save_with_format(path, ImageFormat::Gif).unwrap();
}

/// Write `manifest` as pretty JSON.
pub fn write_manifest(path: &Path, manifest: &Value) {
    ensure_parent(path);
    std::fs::write(path, serde_json::to_string_pretty(manifest).unwrap()).unwrap();
}
