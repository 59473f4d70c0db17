//! Checksum manifest lookup and SHA-256 verification
//!
//! Releases publish a `checksums.txt` in `sha256sum` format:
//!
//! ```text
//! # optional comments
//! 3b5d...e1  al-linux-amd64
//! 9f86...08 *al-windows-amd64.exe
//! ```
//!
//! The first field is the hex digest and the last field is the file name,
//! optionally prefixed with `./` or the `*` binary-mode marker.

use crate::host::Host;
use crate::release::url::ReleaseSource;
use al_core::{DispatchError, Result, Version};
use log::debug;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Splits one manifest line into `(digest, file name)`
///
/// Returns `None` for blank lines, comments, and lines with fewer than two
/// fields.
pub fn parse_manifest_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();
    let digest = fields.next()?;
    let name = fields.last()?;
    let name = name.strip_prefix("./").unwrap_or(name);
    let name = name.strip_prefix('*').unwrap_or(name);
    Some((digest, name))
}

/// Scans a manifest for `asset`; the first matching line wins
pub fn find_checksum<R: Read>(manifest: R, asset: &str) -> io::Result<Option<String>> {
    for line in BufReader::new(manifest).lines() {
        let line = line?;
        if let Some((digest, name)) = parse_manifest_line(&line)
            && name == asset
        {
            return Ok(Some(digest.to_string()));
        }
    }
    Ok(None)
}

/// Fetches the release manifest for `version` and returns the digest of `asset`
///
/// The manifest is downloaded on every call; nothing is cached.
pub fn fetch_checksum(
    host: &dyn Host,
    release: &ReleaseSource,
    version: Version,
    asset: &str,
) -> Result<String> {
    let url = release.checksums_url(version)?;
    let response = host.http_get(&url).map_err(|e| DispatchError::Download {
        url: url.to_string(),
        source: e,
    })?;
    if response.status != 200 {
        return Err(DispatchError::UnexpectedStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    match find_checksum(response.body, asset) {
        Ok(Some(digest)) => Ok(digest),
        Ok(None) => Err(DispatchError::ChecksumNotFound {
            asset: asset.to_string(),
            url: url.to_string(),
        }),
        Err(e) => Err(DispatchError::Download {
            url: url.to_string(),
            source: e,
        }),
    }
}

/// Lowercase hex SHA-256 of the whole file
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| DispatchError::io("open", path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| DispatchError::io("hash", path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Verifies that `path` hashes to `expected` (case-sensitive comparison)
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual != expected {
        return Err(DispatchError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    debug!("checksum verified for {}", path.display());
    Ok(())
}
