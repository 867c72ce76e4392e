//! The thumbnail build pass.
//!
//! Takes the gallery manifest, makes sure every in-scope photo has a thumbnail
//! on disk, records the thumbnail path on the photo record, and writes the
//! manifest back.
//!
//! ## Per-record flow
//!
//! ```text
//! no source field ─────────────────────────────→ skipped (record untouched)
//! source outside image root ───────────────────→ skipped (record untouched)
//! source under image root → thumb field set ─┬─→ existing (file already there)
//!                                            ├─→ source missing
//!                                            ├─→ generated
//!                                            └─→ failed (logged, batch continues)
//! ```
//!
//! The thumb field is written before any image work, so a record whose image
//! is missing or corrupt still points at the computed thumbnail path.
//!
//! ## Output Structure
//!
//! ```text
//! <root>/
//! ├── data.json                  # Rewritten with thumb paths
//! └── img/
//!     ├── dawn.jpg
//!     └── thumbs/
//!         └── dawn_thumb.webp    # ≤ 500px on both sides, WebP q80
//! ```
//!
//! Processing is sequential, in manifest order. Progress is reported through a
//! callback as [`ThumbEvent`]s; formatting them is the job of
//! [`output`](crate::output).

use crate::config::BuilderConfig;
use crate::imaging::{
    Dimensions, ImageBackend, RustBackend, ThumbnailConfig, ThumbnailOutcome, ensure_thumbnail,
};
use crate::manifest::{Manifest, ManifestError};
use crate::resolve::{SourceField, ThumbLayout, source_field};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Progress events emitted while building thumbnails.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbEvent {
    /// A thumbnail was encoded.
    Generated {
        thumb_filename: String,
        dimensions: Dimensions,
    },
    /// Decoding or encoding a source image failed. The record keeps its
    /// computed thumb path.
    Failed { source_filename: String, error: String },
    /// The manifest was written back to disk.
    ManifestSaved { manifest: String },
}

/// Per-run counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Thumbnails encoded in this run.
    pub generated: u32,
    /// Records whose thumbnail file already existed.
    pub existing: u32,
    /// Records whose source image is not on disk.
    pub source_missing: u32,
    /// Records whose source image could not be processed.
    pub failed: u32,
    /// Records with no usable source field, or a source outside the image root.
    pub skipped: u32,
}

impl BuildStats {
    /// Records that ended up with a thumb field.
    pub fn resolved(&self) -> u32 {
        self.generated + self.existing + self.source_missing + self.failed
    }
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} existing, {} missing source, {} failed, {} skipped",
            self.generated, self.existing, self.source_missing, self.failed, self.skipped
        )
    }
}

/// Create the thumbnail directory under `root` if needed. Idempotent.
pub fn ensure_thumb_dir(root: &Path, layout: &ThumbLayout) -> std::io::Result<PathBuf> {
    let dir = ThumbLayout::absolute(root, layout.thumb_dir());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Run the full pass against the gallery at `root` with the production backend.
pub fn build(
    root: &Path,
    config: &BuilderConfig,
    on_event: impl FnMut(&ThumbEvent),
) -> Result<BuildStats, ProcessError> {
    build_with_backend(&RustBackend::new(), root, config, on_event)
}

/// Run the full pass using a specific backend (allows testing with mock).
///
/// A missing manifest is returned as
/// [`ManifestError::NotFound`] wrapped in [`ProcessError::Manifest`]; the
/// thumbnail directory has been created by then.
pub fn build_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &BuilderConfig,
    mut on_event: impl FnMut(&ThumbEvent),
) -> Result<BuildStats, ProcessError> {
    let layout = ThumbLayout::from_config(config);
    ensure_thumb_dir(root, &layout)?;

    let manifest_path = root.join(&config.manifest);
    let mut manifest = Manifest::load(&manifest_path, &config.fields.collection)?;

    let stats = process_photos(
        backend,
        &mut manifest,
        root,
        &layout,
        config,
        &mut on_event,
    );

    manifest.save(&manifest_path)?;
    on_event(&ThumbEvent::ManifestSaved {
        manifest: config.manifest.clone(),
    });

    Ok(stats)
}

/// Walk the photo records in order, setting thumb fields and generating
/// thumbnails. Never fails: per-image errors are reported and counted.
pub fn process_photos(
    backend: &impl ImageBackend,
    manifest: &mut Manifest,
    root: &Path,
    layout: &ThumbLayout,
    config: &BuilderConfig,
    on_event: &mut impl FnMut(&ThumbEvent),
) -> BuildStats {
    let thumbnail_config: ThumbnailConfig = config.thumbnail_config();
    let mut stats = BuildStats::default();

    for photo in manifest.photos_mut() {
        let resolved = match source_field(photo, &config.fields.sources) {
            SourceField::Path(raw) => layout.resolve(raw),
            SourceField::Absent | SourceField::Unusable => None,
        };
        let Some(resolved) = resolved else {
            stats.skipped += 1;
            continue;
        };

        photo.insert(
            config.fields.thumb.clone(),
            Value::String(resolved.thumb.clone()),
        );

        let source = ThumbLayout::absolute(root, &resolved.source);
        let output = ThumbLayout::absolute(root, &resolved.thumb);

        match ensure_thumbnail(backend, &source, &output, &thumbnail_config) {
            Ok(ThumbnailOutcome::Existing) => stats.existing += 1,
            Ok(ThumbnailOutcome::SourceMissing) => stats.source_missing += 1,
            Ok(ThumbnailOutcome::Generated(dimensions)) => {
                stats.generated += 1;
                on_event(&ThumbEvent::Generated {
                    thumb_filename: resolved.thumb_filename,
                    dimensions,
                });
            }
            Err(e) => {
                stats.failed += 1;
                on_event(&ThumbEvent::Failed {
                    source_filename: resolved.source_filename,
                    error: e.to_string(),
                });
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::write_manifest;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    /// Run against a mock and collect every event.
    fn run(
        backend: &MockBackend,
        root: &Path,
        config: &BuilderConfig,
    ) -> (Result<BuildStats, ProcessError>, Vec<ThumbEvent>) {
        let mut events = Vec::new();
        let result = build_with_backend(backend, root, config, |e| events.push(e.clone()));
        (result, events)
    }

    // =========================================================================
    // Directory ensurer
    // =========================================================================

    #[test]
    fn ensure_thumb_dir_creates_parents_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let layout = ThumbLayout::default();

        let dir = ensure_thumb_dir(tmp.path(), &layout).unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, tmp.path().join("img").join("thumbs"));

        ensure_thumb_dir(tmp.path(), &layout).unwrap();
        assert!(dir.is_dir());
    }

    // =========================================================================
    // Manifest handling
    // =========================================================================

    #[test]
    fn missing_manifest_is_not_found_after_dir_created() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();

        let (result, events) = run(&backend, tmp.path(), &BuilderConfig::default());

        assert!(matches!(
            result,
            Err(ProcessError::Manifest(ManifestError::NotFound(_)))
        ));
        assert!(events.is_empty());
        assert!(tmp.path().join("img/thumbs").is_dir());
        assert!(!tmp.path().join("data.json").exists());
    }

    #[test]
    fn malformed_manifest_propagates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("data.json"), "{ not json").unwrap();

        let (result, _) = run(&MockBackend::new(), tmp.path(), &BuilderConfig::default());

        assert!(matches!(
            result,
            Err(ProcessError::Manifest(ManifestError::Json(_)))
        ));
    }

    #[test]
    fn manifest_path_from_config() {
        let tmp = TempDir::new().unwrap();
        let config = BuilderConfig {
            manifest: "site/gallery.json".to_string(),
            ..Default::default()
        };
        fs::create_dir_all(tmp.path().join("site")).unwrap();
        write_manifest(
            &tmp.path().join("site/gallery.json"),
            &json!({"photos": [{"src": "img/a.jpg"}]}),
        );

        let (result, events) = run(&MockBackend::new(), tmp.path(), &config);

        assert_eq!(result.unwrap().source_missing, 1);
        assert_eq!(
            events,
            vec![ThumbEvent::ManifestSaved {
                manifest: "site/gallery.json".to_string()
            }]
        );
        let saved = read_json(&tmp.path().join("site/gallery.json"));
        assert_eq!(saved["photos"][0]["thumb"], "img/thumbs/a_thumb.webp");
    }

    // =========================================================================
    // Per-record behavior
    // =========================================================================

    #[test]
    fn generates_and_records_thumb() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("img/a.jpg");
        touch(&source);
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [{"src": "img/a.jpg"}]}),
        );
        let backend = MockBackend::new().with_source(&source, 2000, 1500);

        let (result, events) = run(&backend, tmp.path(), &BuilderConfig::default());
        let stats = result.unwrap();

        assert_eq!(stats.generated, 1);
        assert_eq!(
            events[0],
            ThumbEvent::Generated {
                thumb_filename: "a_thumb.webp".to_string(),
                dimensions: Dimensions {
                    width: 500,
                    height: 375
                },
            }
        );
        assert!(matches!(events[1], ThumbEvent::ManifestSaved { .. }));

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Thumbnail {
                source: source.to_string_lossy().to_string(),
                output: tmp
                    .path()
                    .join("img")
                    .join("thumbs")
                    .join("a_thumb.webp")
                    .to_string_lossy()
                    .to_string(),
                max_size: 500,
                quality: 80,
            }]
        );

        assert_eq!(
            read_json(&tmp.path().join("data.json")),
            json!({"photos": [{"src": "img/a.jpg", "thumb": "img/thumbs/a_thumb.webp"}]})
        );
    }

    #[test]
    fn records_without_source_are_untouched() {
        let tmp = TempDir::new().unwrap();
        let untouched = json!({"caption": "nothing here", "thumb": "keep/me.webp"});
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [untouched.clone(), {"src": null, "url": "img/b.jpg"}]}),
        );

        let (result, events) = run(&MockBackend::new(), tmp.path(), &BuilderConfig::default());
        let stats = result.unwrap();

        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.resolved(), 0);
        assert_eq!(events.len(), 1);

        let saved = read_json(&tmp.path().join("data.json"));
        assert_eq!(saved["photos"][0], untouched);
        assert_eq!(saved["photos"][1], json!({"src": null, "url": "img/b.jpg"}));
    }

    #[test]
    fn url_field_used_when_src_absent() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [{"url": "./img/b.png"}]}),
        );

        run(&MockBackend::new(), tmp.path(), &BuilderConfig::default())
            .0
            .unwrap();

        let saved = read_json(&tmp.path().join("data.json"));
        assert_eq!(saved["photos"][0]["url"], "./img/b.png");
        assert_eq!(saved["photos"][0]["thumb"], "img/thumbs/b_thumb.webp");
    }

    #[test]
    fn out_of_scope_sources_get_no_thumb() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [
                {"src": "https://cdn.example.com/img/a.jpg"},
                {"src": "uploads/b.jpg"}
            ]}),
        );

        let backend = MockBackend::new();
        let stats = run(&backend, tmp.path(), &BuilderConfig::default())
            .0
            .unwrap();

        assert_eq!(stats.skipped, 2);
        assert_eq!(backend.thumbnail_count(), 0);
        let saved = read_json(&tmp.path().join("data.json"));
        for photo in saved["photos"].as_array().unwrap() {
            assert!(photo.get("thumb").is_none());
        }
    }

    #[test]
    fn existing_thumbnail_not_regenerated_but_field_set() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("img/a.jpg");
        touch(&source);
        touch(&tmp.path().join("img/thumbs/a_thumb.webp"));
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [{"src": "img/a.jpg", "thumb": "old/path.webp"}]}),
        );
        let backend = MockBackend::new().with_source(&source, 800, 800);

        let stats = run(&backend, tmp.path(), &BuilderConfig::default())
            .0
            .unwrap();

        assert_eq!(stats.existing, 1);
        assert_eq!(backend.thumbnail_count(), 0);
        let saved = read_json(&tmp.path().join("data.json"));
        assert_eq!(saved["photos"][0]["thumb"], "img/thumbs/a_thumb.webp");
    }

    #[test]
    fn failed_image_is_reported_and_batch_continues() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("img/bad.jpg");
        let good = tmp.path().join("img/good.jpg");
        touch(&bad);
        touch(&good);
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [{"src": "img/bad.jpg"}, {"src": "img/good.jpg"}]}),
        );
        let backend = MockBackend::new()
            .failing(&bad)
            .with_source(&good, 300, 200);

        let (result, events) = run(&backend, tmp.path(), &BuilderConfig::default());
        let stats = result.unwrap();

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.generated, 1);
        assert!(matches!(
            &events[0],
            ThumbEvent::Failed { source_filename, error }
                if source_filename == "bad.jpg" && error.contains("mock failure")
        ));
        assert!(matches!(&events[1], ThumbEvent::Generated { thumb_filename, .. }
            if thumb_filename == "good_thumb.webp"));

        let saved = read_json(&tmp.path().join("data.json"));
        assert_eq!(saved["photos"][0]["thumb"], "img/thumbs/bad_thumb.webp");
        assert_eq!(saved["photos"][1]["thumb"], "img/thumbs/good_thumb.webp");
    }

    #[test]
    fn second_run_performs_no_encodes() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("img/a.jpg");
        touch(&source);
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"photos": [{"src": "img/a.jpg"}]}),
        );

        // The mock does not write files; stand in for the first run's output.
        let first = MockBackend::new().with_source(&source, 640, 480);
        run(&first, tmp.path(), &BuilderConfig::default()).0.unwrap();
        touch(&tmp.path().join("img/thumbs/a_thumb.webp"));
        let after_first = fs::read_to_string(tmp.path().join("data.json")).unwrap();

        let second = MockBackend::new().with_source(&source, 640, 480);
        let stats = run(&second, tmp.path(), &BuilderConfig::default())
            .0
            .unwrap();

        assert_eq!(second.thumbnail_count(), 0);
        assert_eq!(stats.existing, 1);
        let after_second = fs::read_to_string(tmp.path().join("data.json")).unwrap();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn custom_fields_and_layout() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuilderConfig::default();
        config.fields.collection = "images".into();
        config.fields.sources = vec!["path".into()];
        config.fields.thumb = "preview".into();
        config.paths.image_root = "media".into();
        config.paths.thumb_dir = "media/small".into();
        config.thumbnails.max_size = 200;

        let source = tmp.path().join("media/x.png");
        touch(&source);
        write_manifest(
            &tmp.path().join("data.json"),
            &json!({"images": [{"path": "media/x.png", "src": "img/ignored.jpg"}]}),
        );
        let backend = MockBackend::new().with_source(&source, 1000, 400);

        let stats = run(&backend, tmp.path(), &config).0.unwrap();

        assert_eq!(stats.generated, 1);
        assert!(tmp.path().join("media/small").is_dir());
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Thumbnail { max_size: 200, .. }
        ));
        let saved = read_json(&tmp.path().join("data.json"));
        assert_eq!(saved["images"][0]["preview"], "media/small/x_thumb.webp");
        assert!(saved["images"][0].get("thumb").is_none());
    }

    // =========================================================================
    // Stats
    // =========================================================================

    #[test]
    fn stats_display() {
        let stats = BuildStats {
            generated: 3,
            existing: 10,
            source_missing: 1,
            failed: 2,
            skipped: 4,
        };
        assert_eq!(
            stats.to_string(),
            "3 generated, 10 existing, 1 missing source, 2 failed, 4 skipped"
        );
        assert_eq!(stats.resolved(), 16);
    }
}
