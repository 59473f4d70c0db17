//! RAII lock guard for automatic lock release

use fs2::FileExt;
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};

/// RAII guard for an exclusive file lock
///
/// Dropping the guard unlocks and closes the file, including during
/// unwinding.
#[derive(Debug)]
pub struct LockGuard {
    pub(crate) file: File,
    pub(crate) path: PathBuf,
}

impl LockGuard {
    /// Path of the held lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock too
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("unlock {}: {}", self.path.display(), e);
        }
    }
}
