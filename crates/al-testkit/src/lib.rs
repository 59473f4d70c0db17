//! Test utilities for al
//!
//! Shared helpers for the workspace's unit and integration tests: temporary
//! projects with version pins, fake release binaries, a pre-seeded binary
//! cache, a mock release server, and child processes for cross-process
//! tests.

mod fixtures;
mod mock;
mod process;

pub use fixtures::{
    checksum_line, current_asset_name, current_platform_dir, fake_binary, project_with_pin,
    seed_cache, sha256_hex,
};
pub use mock::ReleaseServer;
pub use process::{CHILD_ENV, child_test_command, is_test_child};
