//! Child processes for cross-process tests
//!
//! A test binary re-runs one of its own tests in a child process. The child
//! test checks [`is_test_child`] and returns early when run normally, so it is
//! a no-op in the parent's own test run.

use std::env;
use std::process::Command;

/// Marks a process started by [`child_test_command`]
pub const CHILD_ENV: &str = "AL_TEST_CHILD";

/// Command that runs only `test_name` of the current test binary, as a child
pub fn child_test_command(test_name: &str) -> Command {
    let exe = env::current_exe().expect("Failed to locate current test binary");
    let mut command = Command::new(exe);
    command
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1");
    command
}

/// Whether this process was started by [`child_test_command`]
pub fn is_test_child() -> bool {
    env::var_os(CHILD_ENV).is_some()
}
