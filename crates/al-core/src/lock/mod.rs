//! Cross-process file locking
//!
//! Advisory whole-file exclusive locks via the fs2 crate (`flock` on Unix,
//! `LockFileEx` on Windows). The lock is visible to other processes, not just
//! other threads, and the OS drops it if the holder dies.
//!
//! There is no timeout: a waiter blocks until the holder releases the lock or
//! exits.

use std::path::Path;

mod acquire;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;


/// Acquires an exclusive lock on `lock_path`, blocking until it is available.
///
/// The lock file is created if absent. Its parent directory must exist.
///
/// # Examples
///
/// ```no_run
/// use al_core::lock::acquire_lock;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let guard = acquire_lock(Path::new("/tmp/al-linux-amd64.lock"))?;
/// // Critical section here
/// drop(guard);
/// # Ok(())
/// # }
/// ```
pub fn acquire_lock(lock_path: &Path) -> Result<LockGuard, LockError> {
    acquire::acquire_exclusive(lock_path)
}

/// Runs `f` while holding an exclusive lock on `lock_path`.
///
/// The lock is released when `f` returns, whether it succeeded, failed, or
/// panicked. `f`'s error is propagated unchanged.
pub fn with_lock<T, E, F>(lock_path: &Path, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<LockError>,
{
    let _guard = acquire_lock(lock_path)?;
    f()
}
