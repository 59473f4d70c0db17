//! Release asset retrieval
//!
//! - [`client`]: HTTP client construction (timeout, user agent)
//! - [`url`]: version-scoped release URLs
//! - [`download`]: streaming an asset into a file
//! - [`checksum`]: checksum manifest lookup and SHA-256 verification

pub mod checksum;
pub mod client;
pub mod download;
pub mod url;

pub use checksum::{fetch_checksum, find_checksum, sha256_file, verify_checksum};
pub use download::download_to_file;
pub use url::ReleaseSource;
