//! # Gallery Thumbs
//!
//! Builds downscaled WebP previews for a photo gallery described by a JSON
//! manifest, and records each preview's path back on its photo record.
//!
//! # One Linear Pass
//!
//! ```text
//! thumbs.toml (optional) → ensure img/thumbs/ → load data.json
//!     → for each photo: resolve source, set "thumb", encode if missing
//!     → rewrite data.json
//! ```
//!
//! There is no scheduler and no cache beyond "the file is already there": a
//! thumbnail that exists at its computed path is never touched again, so a
//! second run does no encoding at all.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Optional `thumbs.toml`, merged over stock defaults and validated |
//! | [`manifest`] | Order-preserving JSON manifest load/save |
//! | [`resolve`] | Source field priority, `./` normalization, thumbnail naming |
//! | [`imaging`] | Fit calculation, backend trait, `image` + `webp` backend |
//! | [`process`] | The build pass, thumbnail directory, progress events, stats |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Base Directory
//!
//! Every path in the manifest is relative. Instead of resolving them against
//! the process working directory, the base directory is passed down through
//! [`process::build`] and joined explicitly, which keeps the library usable
//! from tests and other tools.
//!
//! ## Untyped Manifest
//!
//! The manifest is owned by other tools (an admin UI, an importer). This crate
//! only reads a source field and writes a thumb field, so it keeps the document
//! as a `serde_json` object and leaves everything else exactly as found.
//!
//! ## Skip and Log
//!
//! A corrupt image must not cost the rest of the batch. Per-image failures are
//! reported as events and counted; only manifest and config problems end a run.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod output;
pub mod process;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_helpers;
