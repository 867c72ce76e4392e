//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Generated thumbnail: dawn_thumb.webp (500x375)
//! Error processing broken.jpg: Processing failed: Failed to decode ...
//! Updated data.json with thumb paths.
//! Thumbnails: 1 generated, 12 existing, 0 missing source, 1 failed, 3 skipped
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure: no
//! I/O, no side effects.

use crate::process::{BuildStats, ThumbEvent};

/// Format a single build progress event as display lines.
pub fn format_thumb_event(event: &ThumbEvent) -> Vec<String> {
    match event {
        ThumbEvent::Generated {
            thumb_filename,
            dimensions,
        } => vec![format!(
            "Generated thumbnail: {} ({}x{})",
            thumb_filename, dimensions.width, dimensions.height
        )],
        ThumbEvent::Failed {
            source_filename,
            error,
        } => vec![format!("Error processing {}: {}", source_filename, error)],
        ThumbEvent::ManifestSaved { manifest } => {
            vec![format!("Updated {} with thumb paths.", manifest)]
        }
    }
}

pub fn print_thumb_event(event: &ThumbEvent) {
    for line in format_thumb_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run summary.
pub fn format_summary(stats: &BuildStats) -> Vec<String> {
    vec![format!("Thumbnails: {}", stats)]
}

pub fn print_summary(stats: &BuildStats) {
    for line in format_summary(stats) {
        println!("{}", line);
    }
}

/// Message for a run that ends early because the manifest is absent.
pub fn format_manifest_not_found(manifest: &str) -> String {
    format!("Error: {} not found.", manifest)
}
