use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("{}:{line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl AssetError {
    pub fn malformed(path: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        AssetError::Malformed {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}
