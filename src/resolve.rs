//! Source path resolution and thumbnail naming.
//!
//! A photo record points at its image through one of several fields, tried in
//! priority order. Only paths under the image root are in scope:
//!
//! - `"img/2024/dawn.jpg"` → thumbnail `img/thumbs/dawn_thumb.webp`
//! - `"./img/dawn.jpg"` → normalized to `img/dawn.jpg` first
//! - `"https://cdn.example.com/dawn.jpg"` → out of scope, no thumbnail
//!
//! Everything here works on manifest-relative strings with `/` separators.
//! Turning them into filesystem paths is done against an explicit base
//! directory with [`ThumbLayout::absolute`].

use crate::config::BuilderConfig;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Extension of every generated thumbnail.
pub const THUMB_EXTENSION: &str = "webp";

/// How a photo record's source field was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField<'a> {
    /// None of the accepted fields is present.
    Absent,
    /// The first present field holds `null`, an empty string, or a non-string.
    Unusable,
    /// The first present field holds this path.
    Path(&'a str),
}

/// Read the source path from the first present field in `fields`.
///
/// A present key wins even when its value is unusable; there is no fall-through
/// to later fields in that case.
pub fn source_field<'a>(photo: &'a Map<String, Value>, fields: &[String]) -> SourceField<'a> {
    match fields.iter().find_map(|f| photo.get(f)) {
        None => SourceField::Absent,
        Some(Value::String(s)) if !s.is_empty() => SourceField::Path(s.as_str()),
        Some(_) => SourceField::Unusable,
    }
}

/// A source path accepted for thumbnailing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPhoto {
    /// Normalized source path, relative to the base directory.
    pub source: String,
    /// Source file name, for messages.
    pub source_filename: String,
    /// Thumbnail file name, e.g. `dawn_thumb.webp`.
    pub thumb_filename: String,
    /// Thumbnail path relative to the base directory; goes into the manifest.
    pub thumb: String,
}

/// Directory layout and naming rules for one gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbLayout {
    image_root: String,
    thumb_dir: String,
    suffix: String,
}

impl ThumbLayout {
    pub fn new(image_root: &str, thumb_dir: &str, suffix: &str) -> Self {
        Self {
            image_root: trim_slashes(image_root).to_string(),
            thumb_dir: trim_slashes(thumb_dir).to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(
            &config.paths.image_root,
            &config.paths.thumb_dir,
            &config.thumbnails.suffix,
        )
    }

    /// Thumbnail directory relative to the base directory.
    pub fn thumb_dir(&self) -> &str {
        &self.thumb_dir
    }

    /// Strip a `./` that sits directly in front of the image root.
    pub fn normalize<'a>(&self, path: &'a str) -> &'a str {
        match path.strip_prefix("./") {
            Some(rest) if self.under_image_root(rest) => rest,
            _ => path,
        }
    }

    fn under_image_root(&self, path: &str) -> bool {
        path.strip_prefix(self.image_root.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Thumbnail file name for a source path: stem + suffix + `.webp`.
    pub fn thumb_filename(&self, source: &str) -> String {
        let basename = source.rsplit('/').next().unwrap_or(source);
        let stem = Path::new(basename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}.{}", stem, self.suffix, THUMB_EXTENSION)
    }

    /// Resolve a raw source path, or `None` if it lies outside the image root.
    pub fn resolve(&self, raw: &str) -> Option<ResolvedPhoto> {
        let source = self.normalize(raw);
        if !self.under_image_root(source) {
            return None;
        }

        let thumb_filename = self.thumb_filename(source);
        Some(ResolvedPhoto {
            source: source.to_string(),
            source_filename: source.rsplit('/').next().unwrap_or(source).to_string(),
            thumb: format!("{}/{}", self.thumb_dir, thumb_filename),
            thumb_filename,
        })
    }

    /// Join a base-relative, `/`-separated path onto `base`.
    pub fn absolute(base: &Path, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(base.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl Default for ThumbLayout {
    fn default() -> Self {
        Self::from_config(&BuilderConfig::default())
    }
}

fn trim_slashes(s: &str) -> &str {
    s.trim_start_matches("./").trim_matches('/')
}
