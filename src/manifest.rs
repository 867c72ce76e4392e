//! Gallery manifest loading and writing.
//!
//! The manifest is kept as an untyped JSON object rather than a typed struct:
//! the builder only touches the photo list, and every other key (videos, site
//! settings, fields it has never heard of) must survive a rewrite byte-for-byte
//! in meaning and in order. `serde_json` is built with `preserve_order`, so
//! object keys stay where they were on disk.
//!
//! ```json
//! {
//!   "photos": [
//!     { "src": "img/a.jpg", "thumb": "img/thumbs/a_thumb.webp" },
//!     { "url": "https://example.com/b.jpg" }
//!   ],
//!   "videos": []
//! }
//! ```

use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest must be a JSON object")]
    NotAnObject,
    #[error("manifest has no \"{0}\" list")]
    MissingCollection(String),
}

/// A gallery manifest with a known photo collection key.
#[derive(Debug, Clone)]
pub struct Manifest {
    root: Map<String, Value>,
    collection: String,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// A missing file is reported as [`ManifestError::NotFound`] so callers can
    /// end the run with a message instead of a crash.
    pub fn load(path: &Path, collection: &str) -> Result<Self, ManifestError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ManifestError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content, collection)
    }

    /// Parse manifest JSON, checking that `collection` holds a list.
    pub fn parse(json: &str, collection: &str) -> Result<Self, ManifestError> {
        let root = match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => map,
            _ => return Err(ManifestError::NotAnObject),
        };
        if !matches!(root.get(collection), Some(Value::Array(_))) {
            return Err(ManifestError::MissingCollection(collection.to_string()));
        }
        Ok(Self {
            root,
            collection: collection.to_string(),
        })
    }

    /// Photo records in manifest order. Entries that are not JSON objects are
    /// passed over.
    pub fn photos_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.root
            .get_mut(&self.collection)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
    }

    /// Pretty-printed JSON: 2-space indentation, non-ASCII left unescaped,
    /// no trailing newline.
    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Overwrite `path` with the current document.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
