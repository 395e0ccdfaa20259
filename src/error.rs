//! Error types for the review engine and its collaborators

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the review session
#[derive(Error, Debug)]
pub enum SwipeError {
    /// The media catalog refused access
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O failure while talking to a collaborator
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A queue operation was called with no current item
    #[error("No current item: cursor {cursor} is at the end of {len} items")]
    OutOfRange { cursor: usize, len: usize },

    /// The same item id was supplied twice for one session
    #[error("Duplicate item id in session: {0}")]
    DuplicateId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No async runtime was available to run background work
    #[error("Runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, SwipeError>;

/// Failures reported by a [`MediaCatalog`](crate::domain::MediaCatalog)
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("permission denied for {0:?}")]
    PermissionDenied(PathBuf),

    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Classifies an I/O error raised while reading `path`
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            CatalogError::PermissionDenied(path)
        } else {
            CatalogError::Io { path, source }
        }
    }
}

impl From<CatalogError> for SwipeError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::PermissionDenied(path) => {
                SwipeError::PermissionDenied(path.display().to_string())
            }
            CatalogError::Io { source, .. } => SwipeError::Io(source),
            CatalogError::NotADirectory { path } => SwipeError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", path.display()),
            )),
        }
    }
}

/// Failures reported by a [`MediaStore`](crate::deletion::MediaStore).
///
/// These never reach the review flow; the deletion coordinator logs them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("permission denied deleting {0}")]
    PermissionDenied(String),

    /// The store has no implementation for the requested path
    #[error("operation not supported by this store")]
    Unsupported,

    #[error("delete failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
