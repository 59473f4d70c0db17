//! Lock acquisition

use super::{LockError, LockGuard};
use fs2::FileExt;
use log::info;
use std::fs::OpenOptions;
use std::path::Path;

/// Opens (creating if needed) and exclusively locks `lock_path`
pub(crate) fn acquire_exclusive(lock_path: &Path) -> Result<LockGuard, LockError> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| LockError::Io {
            source: e,
            path: lock_path.to_path_buf(),
            operation: "open lock file",
        })?;

    // Uncontended case first so a waiting message is only shown when needed
    match file.try_lock_exclusive() {
        Ok(()) => {}
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
            info!("Waiting for lock on {}...", lock_path.display());
            file.lock_exclusive().map_err(|e| LockError::Io {
                source: e,
                path: lock_path.to_path_buf(),
                operation: "acquire lock",
            })?;
        }
        Err(e) => {
            return Err(LockError::Io {
                source: e,
                path: lock_path.to_path_buf(),
                operation: "acquire lock",
            });
        }
    }

    Ok(LockGuard {
        file,
        path: lock_path.to_path_buf(),
    })
}
