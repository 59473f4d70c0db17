//! Version metadata stamped in at compile time
//!
//! Release builds set `AL_BUILD_VERSION` (and optionally `AL_BUILD_COMMIT`
//! and `AL_BUILD_DATE`) in the compiler's environment. Local builds report
//! `dev`.

use al_core::version::DEV;

pub const VERSION: &str = match option_env!("AL_BUILD_VERSION") {
    Some(version) => version,
    None => DEV,
};

pub const COMMIT: Option<&str> = option_env!("AL_BUILD_COMMIT");

pub const DATE: Option<&str> = option_env!("AL_BUILD_DATE");

/// `al <version>`, plus commit and build date when known
pub fn version_line() -> String {
    let mut line = format!("al {}", VERSION);
    match (COMMIT, DATE) {
        (Some(commit), Some(date)) => line.push_str(&format!(" (commit {}, built {})", commit, date)),
        (Some(commit), None) => line.push_str(&format!(" (commit {})", commit)),
        (None, Some(date)) => line.push_str(&format!(" (built {})", date)),
        (None, None) => {}
    }
    line
}
