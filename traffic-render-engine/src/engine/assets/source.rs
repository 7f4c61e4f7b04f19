use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::AssetError;

/// Where model description files come from.
pub trait AssetSource: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, AssetError>;
}

/// Reads model files relative to a root directory.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn read_to_string(&self, path: &Path) -> Result<String, AssetError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::NotFound { path: full },
            _ => AssetError::Io { path: full, source },
        })
    }
}

/// In-memory file table, for embedded models and tests.
#[derive(Default)]
pub struct MemoryAssetSource {
    files: HashMap<PathBuf, String>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn read_to_string(&self, path: &Path) -> Result<String, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_path_buf(),
            })
    }
}
