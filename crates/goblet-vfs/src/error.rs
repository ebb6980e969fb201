//! VFS error types.

use std::io;
use thiserror::Error;

/// VFS error type.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Resolved path is not in the table.
    #[error("not found: {0}")]
    NotFound(String),

    /// Prefix derivation was attempted on a filesystem with no tables attached.
    #[error("invalid receiver: filesystem is not initialized")]
    InvalidReceiver,

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Mount config sets both `prefix` and `ignored_prefix`.
    #[error("mount config sets both prefix and ignored_prefix")]
    ConflictingPrefixes,

    /// Bundle encode/decode failure.
    #[error("bundle codec error: {0}")]
    Decode(#[from] postcard::Error),

    /// Mount config parse failure.
    #[error("RON parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Returns true for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_))
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::InvalidReceiver => {
                io::Error::new(io::ErrorKind::InvalidInput, "filesystem is not initialized")
            }
            VfsError::ConflictingPrefixes => io::Error::new(
                io::ErrorKind::InvalidInput,
                "mount config sets both prefix and ignored_prefix",
            ),
            VfsError::Decode(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            VfsError::Config(e) => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;
