//! Document store trait and filesystem implementation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting a document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for document store backends
///
/// Paths are relative to the store's root. Writing to an existing path
/// replaces its content.
pub trait Store: Send + Sync {
    /// Checks that the store can accept writes before a crawl starts
    ///
    /// Failure here aborts the crawl.
    fn prepare(&self) -> StoreResult<()>;

    /// Writes a document, creating parent directories as needed
    fn store(&self, relative_path: &Path, content: &str) -> StoreResult<()>;
}

/// Store that writes plain files under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Store for FileStore {
    fn prepare(&self) -> StoreResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| Self::io_error(&self.root, e))?;

        let metadata =
            std::fs::metadata(&self.root).map_err(|e| Self::io_error(&self.root, e))?;
        if metadata.permissions().readonly() {
            return Err(Self::io_error(
                &self.root,
                std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "output root is read-only",
                ),
            ));
        }

        Ok(())
    }

    fn store(&self, relative_path: &Path, content: &str) -> StoreResult<()> {
        let path = self.root.join(relative_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }

        std::fs::write(&path, content).map_err(|e| Self::io_error(&path, e))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
