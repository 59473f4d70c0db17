//! Versioned binary cache
//!
//! Layout: `<root>/versions/<version>/<os>-<arch>/<asset>`, with the install
//! lock `<asset>.lock` next to the binary. A path that exists is trusted as a
//! finished install because binaries only appear there by atomic rename after
//! their checksum matched.

use crate::host::Host;
use crate::platform::{Os, Platform};
use crate::release::{ReleaseSource, download_to_file, fetch_checksum, verify_checksum};
use al_core::config::{cache::VERSIONS_DIR, env::NO_NETWORK};
use al_core::lock::with_lock;
use al_core::{DispatchError, Result, Version};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix of the per-asset lock file
const LOCK_SUFFIX: &str = ".lock";

/// Infix of staged downloads, `<asset>.tmp-XXXXXX`
const TEMP_INFIX: &str = ".tmp-";

/// Cache path of `version` for `platform` under `root`
pub fn entry_path(root: &Path, version: Version, platform: Platform) -> PathBuf {
    root.join(VERSIONS_DIR)
        .join(version.to_string())
        .join(platform.to_string())
        .join(platform.asset_name())
}

/// Ensures release binaries are present in the cache, downloading on miss
pub struct BinaryCache<'a> {
    host: &'a dyn Host,
    release: &'a ReleaseSource,
    offline: bool,
}

impl<'a> BinaryCache<'a> {
    pub fn new(host: &'a dyn Host, release: &'a ReleaseSource) -> Self {
        Self {
            host,
            release,
            offline: false,
        }
    }

    /// Forbids downloads; a miss fails with [`DispatchError::NetworkDisabled`]
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Returns the path of a verified, executable binary for `version`
    ///
    /// On a cache hit nothing is locked or fetched. On a miss the download
    /// runs under a cross-process lock, so concurrent callers asking for the
    /// same version fetch it once and all receive the same path.
    pub fn ensure(&self, root: &Path, version: Version) -> Result<PathBuf> {
        let platform = self.host.platform()?;
        let bin_path = entry_path(root, version, platform);

        if self.is_installed(&bin_path)? {
            debug!("cache hit: {}", bin_path.display());
            return Ok(bin_path);
        }

        if self.offline {
            return Err(DispatchError::NetworkDisabled {
                version: version.to_string(),
                path: bin_path,
                var: NO_NETWORK,
            });
        }

        let dir = bin_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        fs::create_dir_all(&dir).map_err(|e| DispatchError::io("create cache dir", &dir, e))?;

        let asset = platform.asset_name();
        let lock_path = dir.join(format!("{}{}", asset, LOCK_SUFFIX));

        with_lock(&lock_path, || {
            // Another process may have finished while we waited
            if self.is_installed(&bin_path)? {
                debug!("installed by another process: {}", bin_path.display());
                return Ok(bin_path.clone());
            }

            sweep_stale_temps(&dir, &asset);
            self.install(version, platform, &dir, &bin_path)?;
            Ok(bin_path.clone())
        })
    }

    fn is_installed(&self, bin_path: &Path) -> Result<bool> {
        self.host
            .exists(bin_path)
            .map_err(|e| DispatchError::io("check cached binary", bin_path, e))
    }

    /// Downloads, verifies, and renames into place. Must hold the asset lock.
    fn install(
        &self,
        version: Version,
        platform: Platform,
        dir: &Path,
        bin_path: &Path,
    ) -> Result<()> {
        let asset = platform.asset_name();
        let prefix = format!("{}{}", asset, TEMP_INFIX);

        let mut staged = self
            .host
            .create_temp(dir, &prefix)
            .map_err(|e| DispatchError::io("create temp file", dir, e))?;

        let url = self.release.asset_url(version, &asset)?;
        info!("Downloading al {} for {} from {}", version, platform, url);
        download_to_file(self.host, &url, staged.as_file_mut())?;

        let staged_path = staged.path().to_path_buf();
        staged
            .as_file_mut()
            .flush()
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| DispatchError::io("sync temp file", &staged_path, e))?;

        // Closes the handle; the path is still removed on drop
        let staged = staged.into_temp_path();

        let expected = fetch_checksum(self.host, self.release, version, &asset)?;
        verify_checksum(&staged, &expected)?;

        if platform.os != Os::Windows {
            self.host
                .make_executable(&staged)
                .map_err(|e| DispatchError::io("chmod", &staged_path, e))?;
        }

        self.host
            .persist(staged, bin_path)
            .map_err(|e| DispatchError::io("rename", bin_path, e))?;

        info!("Installed al {} at {}", version, bin_path.display());
        Ok(())
    }
}

/// Removes `<asset>.tmp-*` leftovers of crashed installs
///
/// Only the lock holder creates temp files, so any present while the lock is
/// held are orphans. Lock files are never touched.
fn sweep_stale_temps(dir: &Path, asset: &str) {
    let prefix = format!("{}{}", asset, TEMP_INFIX);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("could not scan {} for stale downloads: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(&prefix) {
            continue;
        }
        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => debug!("removed stale download {}", path.display()),
            Err(e) => warn!("could not remove stale download {}: {}", path.display(), e),
        }
    }
}
