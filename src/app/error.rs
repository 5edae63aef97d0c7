use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Base directory does not exist: {}", .0.display())]
    BaseDirMissing(PathBuf),
    #[error("Base directory is not a directory: {}", .0.display())]
    BaseDirNotDirectory(PathBuf),
    #[error("Cannot access base directory {}: {source}", path.display())]
    BaseDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File system walk error: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Path {} is not under base directory {}", path.display(), base.display())]
    OutsideBase { path: PathBuf, base: PathBuf },

    #[error("Failed to write index {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern {0}: {1}")]
    InvalidGlob(String, #[source] globset::Error),
}

impl IndexError {
    /// Failures while locating or walking the tree. Nothing is written.
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            IndexError::BaseDirMissing(_)
                | IndexError::BaseDirNotDirectory(_)
                | IndexError::BaseDirUnreadable { .. }
                | IndexError::Walk(_)
                | IndexError::OutsideBase { .. }
        )
    }

    /// Failures while persisting the rendered index.
    pub fn is_io(&self) -> bool {
        matches!(self, IndexError::Write { .. })
    }
}
