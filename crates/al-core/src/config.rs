//! Constants shared by the dispatch subsystem

/// Environment variable names
pub mod env {
    /// Explicit version request; outranks the project pin
    pub const VERSION_OVERRIDE: &str = "AL_VERSION";

    /// Refuse to download when set to any non-empty value
    pub const NO_NETWORK: &str = "AL_NO_NETWORK";

    /// Cache root override
    pub const CACHE_DIR: &str = "AL_CACHE_DIR";

    /// Set on the dispatched child to stop it from dispatching again
    pub const SHIM_ACTIVE: &str = "AL_SHIM_ACTIVE";

    /// Value written into [`SHIM_ACTIVE`] for the child process
    pub const SHIM_ACTIVE_VALUE: &str = "1";
}

/// Project layout
pub mod project {
    /// Metadata directory that marks a project root
    pub const METADATA_DIR: &str = ".agent-layer";

    /// Pin file inside [`METADATA_DIR`]
    pub const PIN_FILE: &str = "al.version";
}

/// Cache layout
pub mod cache {
    /// Subdirectory of the per-user cache dir
    pub const SUBDIR: &str = "agent-layer";

    /// Directory under the cache root holding one entry per version
    pub const VERSIONS_DIR: &str = "versions";
}

/// Release download settings
pub mod release {
    use std::time::Duration;

    /// Base URL for release downloads
    pub const BASE_URL: &str = "https://github.com/conn-castle/agent-layer/releases";

    /// Checksum manifest published next to every release's binaries
    pub const CHECKSUMS_FILE: &str = "checksums.txt";

    /// Timeout applied to every release HTTP request
    pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

    /// User agent sent with release requests
    pub const USER_AGENT: &str = "al";

    /// Prefix of release asset names (`al-<os>-<arch>`)
    pub const ASSET_PREFIX: &str = "al";
}
