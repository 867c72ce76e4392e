//! Builder configuration.
//!
//! Handles loading, validating, and merging an optional `thumbs.toml` placed in
//! the gallery's base directory. Stock defaults reproduce the classic layout
//! (`data.json`, `img/`, `img/thumbs/`, 500px, quality 80), so the file is only
//! needed to deviate from it.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! manifest = "data.json"      # Manifest path, relative to the base directory
//!
//! [paths]
//! image_root = "img"          # Sources outside this directory are ignored
//! thumb_dir = "img/thumbs"    # Where thumbnails are written
//!
//! [fields]
//! collection = "photos"       # Manifest key holding the photo list
//! sources = ["src", "url"]    # Source-path fields, first present wins
//! thumb = "thumb"             # Field that receives the thumbnail path
//!
//! [thumbnails]
//! max_size = 500              # Bound on both sides, in pixels
//! quality = 80                # WebP quality (1-100)
//! suffix = "_thumb"           # Appended to the source file stem
//! ```
//!
//! Config files are sparse; override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{Quality, ThumbnailConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside the base directory.
pub const CONFIG_FILENAME: &str = "thumbs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Builder configuration loaded from `thumbs.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Manifest path relative to the base directory.
    pub manifest: String,
    /// Image and thumbnail directories.
    pub paths: PathsConfig,
    /// Manifest field names.
    pub fields: FieldsConfig,
    /// Thumbnail encoding settings.
    pub thumbnails: ThumbnailsConfig,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            manifest: "data.json".to_string(),
            paths: PathsConfig::default(),
            fields: FieldsConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
        }
    }
}

impl BuilderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.quality == 0 || self.thumbnails.quality > 100 {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.thumbnails.max_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_size must be non-zero".into(),
            ));
        }
        if self.fields.sources.is_empty() {
            return Err(ConfigError::Validation(
                "fields.sources must not be empty".into(),
            ));
        }
        let names = [
            ("manifest", self.manifest.as_str()),
            ("paths.image_root", self.paths.image_root.as_str()),
            ("paths.thumb_dir", self.paths.thumb_dir.as_str()),
            ("fields.collection", self.fields.collection.as_str()),
            ("fields.thumb", self.fields.thumb.as_str()),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.fields.sources.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "fields.sources entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Encoding settings in the form the imaging layer expects.
    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            max_size: self.thumbnails.max_size,
            quality: Quality::new(self.thumbnails.quality),
        }
    }
}

/// Image and thumbnail directories, relative to the base directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub image_root: String,
    pub thumb_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            image_root: "img".to_string(),
            thumb_dir: "img/thumbs".to_string(),
        }
    }
}

/// Field names used inside the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldsConfig {
    /// Top-level key holding the photo list.
    pub collection: String,
    /// Source-path fields in priority order.
    pub sources: Vec<String>,
    /// Field that receives the thumbnail path.
    pub thumb: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            collection: "photos".to_string(),
            sources: vec!["src".to_string(), "url".to_string()],
            thumb: "thumb".to_string(),
        }
    }
}

/// Thumbnail encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub max_size: u32,
    pub quality: u32,
    pub suffix: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_size: 500,
            quality: 80,
            suffix: "_thumb".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuilderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `thumbs.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuilderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuilderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `thumbs.toml` in the base directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<BuilderConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `thumbs.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Thumbs Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to the manifest, in the directory passed as --root.
# Unknown keys will cause an error.

# Manifest path, relative to the base directory.
manifest = "data.json"

# ---------------------------------------------------------------------------
# Directories (relative to the base directory, "/" separated)
# ---------------------------------------------------------------------------
[paths]
# Only sources under this directory get thumbnails. Anything else
# (external URLs, other folders) is left alone.
image_root = "img"

# Generated thumbnails are written here; created if missing.
thumb_dir = "img/thumbs"

# ---------------------------------------------------------------------------
# Manifest fields
# ---------------------------------------------------------------------------
[fields]
# Top-level key holding the list of photo records.
collection = "photos"

# Fields that may hold a record's source path, checked in order.
sources = ["src", "url"]

# Field that receives the thumbnail path. Always overwritten.
thumb = "thumb"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Neither side of a thumbnail exceeds this many pixels.
# Smaller images keep their size.
max_size = 500

# WebP encoding quality (1 = worst, 100 = best).
quality = 80

# Appended to the source file stem: photo.jpg -> photo_thumb.webp
suffix = "_thumb"
"##
}
