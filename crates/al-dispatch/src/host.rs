//! OS and network primitives used by the binary cache
//!
//! Production code wires [`SystemHost`]; tests wire fakes that wrap it and
//! override single operations (failing a rename, reporting another
//! platform, ...).

use crate::platform::Platform;
use crate::release::client::build_client;
use al_core::Result;
use reqwest::blocking::Client;
use std::io::{self, Read};
use std::path::Path;
use std::sync::OnceLock;
use tempfile::{NamedTempFile, TempPath};
use url::Url;

/// Response of a GET request: status plus a streaming body
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read + Send>,
}

/// Primitives the binary cache needs from the host
pub trait Host: Send + Sync {
    /// Platform whose release asset should be used
    fn platform(&self) -> Result<Platform>;

    /// Reports whether `path` exists; errors other than "not found" propagate
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Creates a temp file in `dir` whose name starts with `prefix`
    fn create_temp(&self, dir: &Path, prefix: &str) -> io::Result<NamedTempFile>;

    /// Marks `path` executable
    fn make_executable(&self, path: &Path) -> io::Result<()>;

    /// Atomically renames `staged` onto `dest`
    ///
    /// On failure `staged` is dropped, which removes the temp file.
    fn persist(&self, staged: TempPath, dest: &Path) -> io::Result<()>;

    /// Issues a GET request; transport failures are reported as I/O errors
    fn http_get(&self, url: &Url) -> io::Result<HttpResponse>;
}

/// Real filesystem, real platform, real network
///
/// The HTTP client is only built by the first request, so runs that never
/// download pay nothing for it.
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    client: OnceLock<Client>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = build_client()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Host for SystemHost {
    fn platform(&self) -> Result<Platform> {
        Platform::current()
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn create_temp(&self, dir: &Path, prefix: &str) -> io::Result<NamedTempFile> {
        tempfile::Builder::new().prefix(prefix).tempfile_in(dir)
    }

    #[cfg(unix)]
    fn make_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
    }

    #[cfg(not(unix))]
    fn make_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn persist(&self, staged: TempPath, dest: &Path) -> io::Result<()> {
        staged.persist(dest).map(|_| ()).map_err(|e| e.error)
    }

    fn http_get(&self, url: &Url) -> io::Result<HttpResponse> {
        let response = self
            .client()
            .map_err(io::Error::other)?
            .get(url.as_str())
            .send()
            .map_err(|e| io::Error::other(e.without_url()))?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
            body: Box::new(response),
        })
    }
}
