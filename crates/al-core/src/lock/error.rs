//! Error types for file locking

use std::fmt;
use std::path::PathBuf;

/// Error type for lock operations
#[derive(Debug)]
pub enum LockError {
    /// I/O error while opening or locking the lock file
    Io {
        /// The underlying I/O error
        source: std::io::Error,
        /// Path to the lock file
        path: PathBuf,
        /// Operation that failed
        operation: &'static str,
    },
}

impl LockError {
    /// Path of the lock file involved
    pub fn path(&self) -> &PathBuf {
        match self {
            LockError::Io { path, .. } => path,
        }
    }
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Io {
                source,
                path,
                operation,
            } => {
                write!(f, "{} {}: {}", operation, path.display(), source)
            }
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LockError::Io { source, .. } => Some(source),
        }
    }
}
