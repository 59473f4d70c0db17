//! Cross-process cache fill tests
//!
//! Several child processes fill the same empty cache entry at once. The
//! release server sees one download no matter how many processes race.

use al_core::Version;
use al_dispatch::cache::{BinaryCache, entry_path};
use al_dispatch::host::SystemHost;
use al_dispatch::platform::Platform;
use al_dispatch::release::ReleaseSource;
use al_testkit::{ReleaseServer, child_test_command, current_asset_name, fake_binary, is_test_child};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;

const V1: Version = Version::new(1, 0, 0);

const CACHE_ROOT: &str = "AL_TEST_CACHE_ROOT";
const RELEASE_URL: &str = "AL_TEST_RELEASE_URL";
const INSTALLED: &str = "installed=";

/// Child side: fill the cache entry and report its path on stdout
#[test]
fn child_ensure_binary() {
    if !is_test_child() {
        return;
    }
    let root = PathBuf::from(env::var_os(CACHE_ROOT).expect("cache root not set"));
    let release = ReleaseSource::new(&env::var(RELEASE_URL).unwrap()).unwrap();
    let host = SystemHost::new();

    let path = BinaryCache::new(&host, &release).ensure(&root, V1).unwrap();
    println!("{}{}", INSTALLED, path.display());
}

#[test]
fn test_parallel_processes_download_once() {
    let mut server = ReleaseServer::new();
    let asset = current_asset_name();
    let body = fake_binary("1.0.0", 0);
    let (asset_mock, sums_mock) = server.mock_release("1.0.0", &asset, &body, 1);
    let cache = TempDir::new().unwrap();

    const NUM_PROCESSES: usize = 6;
    let children: Vec<_> = (0..NUM_PROCESSES)
        .map(|_| {
            child_test_command("child_ensure_binary")
                .env(CACHE_ROOT, cache.path())
                .env(RELEASE_URL, server.base_url())
                .stdout(Stdio::piped())
                .spawn()
                .expect("Failed to spawn child process")
        })
        .collect();

    let expected = entry_path(cache.path(), V1, Platform::current().unwrap());
    for child in children {
        let output = child.wait_with_output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "child failed:\n{}", stdout);

        let installed = stdout
            .lines()
            .find_map(|line| line.split_once(INSTALLED).map(|(_, path)| path.trim()))
            .unwrap_or_else(|| panic!("no install path in child output:\n{}", stdout));
        assert_eq!(Path::new(installed), expected);
    }

    asset_mock.assert();
    sums_mock.assert();
    assert_eq!(fs::read(&expected).unwrap(), body);

    // No temp files survive the race
    let mut names: Vec<String> = fs::read_dir(expected.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec![asset.clone(), format!("{}.lock", asset)]);
}
