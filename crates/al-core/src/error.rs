use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    // Contract errors
    #[error("DISPATCH_MISSING_ARGV0: missing argv[0]")]
    MissingArgv0,

    #[error("DISPATCH_WORKING_DIR_REQUIRED: working directory is required")]
    WorkingDirRequired,

    #[error("DISPATCH_EXIT_HANDLER_REQUIRED: exit handler is required")]
    ExitHandlerRequired,

    // Version errors
    #[error("VERSION_REQUIRED: version string is empty")]
    VersionRequired,

    #[error("VERSION_INVALID: invalid version {raw:?} (expected vX.Y.Z or X.Y.Z)")]
    InvalidVersion { raw: String },

    #[error("VERSION_INVALID_BUILD: invalid build version {raw:?}: {source}")]
    InvalidBuildVersion {
        raw: String,
        #[source]
        source: Box<DispatchError>,
    },

    #[error("VERSION_INVALID_OVERRIDE: invalid {var}: {source}")]
    InvalidOverride {
        var: &'static str,
        #[source]
        source: Box<DispatchError>,
    },

    // Project errors
    #[error("PROJECT_PATH_NOT_DIR: {} exists but is not a directory", .path.display())]
    ProjectPathNotDir { path: PathBuf },

    #[error("PIN_EMPTY: pin file {} is empty", .path.display())]
    EmptyPin { path: PathBuf },

    #[error("PIN_INVALID: invalid pinned version in {}: {source}", .path.display())]
    InvalidPin {
        path: PathBuf,
        #[source]
        source: Box<DispatchError>,
    },

    // Platform errors
    #[error("PLATFORM_UNSUPPORTED_OS: unsupported OS {0:?}")]
    UnsupportedOs(String),

    #[error("PLATFORM_UNSUPPORTED_ARCH: unsupported architecture {0:?}")]
    UnsupportedArch(String),

    // Policy errors
    #[error(
        "DISPATCH_ALREADY_ACTIVE: version dispatch already active (current {current}, requested {requested})"
    )]
    DispatchAlreadyActive { current: String, requested: String },

    #[error("DISPATCH_TO_DEV: cannot dispatch to dev version; set {var} to a release version")]
    CannotDispatchToDev { var: &'static str },

    #[error(
        "NETWORK_DISABLED: version {version} is not cached (expected at {}); network access disabled via {var}",
        .path.display()
    )]
    NetworkDisabled {
        version: String,
        path: PathBuf,
        var: &'static str,
    },

    #[error("CACHE_DIR_UNAVAILABLE: could not determine user cache directory; set {var}")]
    CacheDirUnavailable { var: &'static str },

    // Integrity errors
    #[error("CHECKSUM_NOT_FOUND: checksum for {asset} not found in {url}")]
    ChecksumNotFound { asset: String, url: String },

    #[error("CHECKSUM_MISMATCH: checksum mismatch for {} (expected {expected}, got {actual})", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // Transport errors
    #[error("DOWNLOAD_FAILED: download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("DOWNLOAD_UNEXPECTED_STATUS: download {url}: unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("RELEASE_URL_INVALID: {0}")]
    ReleaseUrl(String),

    #[error("HTTP_CLIENT_FAILED: build HTTP client: {0}")]
    HttpClient(String),

    // Process errors
    #[error("DISPATCH_EXEC_FAILED: exec {}: {source}", .path.display())]
    Exec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DISPATCH_SPAWN_FAILED: run {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO_ERROR: {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("LOCK_ERROR: {0}")]
    Lock(#[from] LockError),
}

impl DispatchError {
    /// Wraps an I/O error with the operation and path it happened on
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DispatchError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
