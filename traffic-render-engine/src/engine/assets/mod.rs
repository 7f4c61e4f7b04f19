//! Model assets and session configuration.
//!
//! Meshes are read from Wavefront OBJ/MTL files through an [`source::AssetSource`],
//! expanded into flat per-face-vertex streams and memoised by the
//! [`cache::AssetCache`] under a `(model name, brightness)` key.

/// Memoising mesh cache and the cached vertex stream type.
pub mod cache;

pub mod error;

/// Material library (`.mtl`) parser.
pub mod mtl;

/// Mesh (`.obj`) parser producing per-material face groups.
pub mod obj;

/// JSON session configuration loaded as a Bevy asset.
pub mod scene_config;

/// Filesystem and in-memory model sources.
pub mod source;
