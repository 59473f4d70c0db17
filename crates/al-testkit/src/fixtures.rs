//! Project, binary, and cache fixtures

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temp project with `.agent-layer/`, pinned to `pin` when given
///
/// The pin is written verbatim, so callers can test malformed content.
pub fn project_with_pin(pin: Option<&str>) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp project");
    let meta = temp.path().join(".agent-layer");
    fs::create_dir(&meta).expect("Failed to create .agent-layer");
    if let Some(pin) = pin {
        fs::write(meta.join("al.version"), pin).expect("Failed to write al.version");
    }
    temp
}

/// Shell script standing in for a released `al` binary
///
/// When run it prints `al <version>` followed by its arguments and the value
/// of `AL_SHIM_ACTIVE`, then exits with `exit_code`.
pub fn fake_binary(version: &str, exit_code: i32) -> Vec<u8> {
    format!(
        "#!/bin/sh\necho \"al {} args=[$*] shim=${{AL_SHIM_ACTIVE}}\"\nexit {}\n",
        version, exit_code
    )
    .into_bytes()
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// One `sha256sum`-style manifest line
pub fn checksum_line(digest: &str, asset: &str) -> String {
    format!("{}  {}\n", digest, asset)
}

/// `<os>-<arch>` directory name of the running platform, as used in the cache
///
/// # Panics
///
/// Panics on platforms without published release binaries.
pub fn current_platform_dir() -> String {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        "linux" => "linux",
        "windows" => "windows",
        other => panic!("no release binaries for OS {}", other),
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => panic!("no release binaries for arch {}", other),
    };
    format!("{}-{}", os, arch)
}

/// Release asset name of the running platform, e.g. `al-linux-amd64`
pub fn current_asset_name() -> String {
    let name = format!("al-{}", current_platform_dir());
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name
    }
}

/// Places `bytes` in the cache under `root` as an installed `version`
///
/// Returns the binary path. The file is made executable on Unix.
pub fn seed_cache(root: &Path, version: &str, bytes: &[u8]) -> PathBuf {
    let dir = root
        .join("versions")
        .join(version)
        .join(current_platform_dir());
    fs::create_dir_all(&dir).expect("Failed to create cache dir");
    let path = dir.join(current_asset_name());
    fs::write(&path, bytes).expect("Failed to write cached binary");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod cached binary");
    }

    path
}
