//! Mock release server
//!
//! Serves `/download/v<version>/<asset>` and `/download/v<version>/checksums.txt`
//! the way the real release host lays them out. Each test gets its own
//! server, so mocks never collide across parallel tests.

use crate::fixtures::{checksum_line, sha256_hex};
use mockito::{Mock, Server, ServerGuard};

pub struct ReleaseServer {
    server: ServerGuard,
}

impl ReleaseServer {
    pub fn new() -> Self {
        Self {
            server: Server::new(),
        }
    }

    /// Base URL to configure as the release source
    pub fn base_url(&self) -> String {
        self.server.url()
    }

    /// Serves `body` as `asset` of `version`, expecting exactly `hits` requests
    pub fn mock_asset(&mut self, version: &str, asset: &str, body: &[u8], hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/download/v{}/{}", version, asset).as_str())
            .with_status(200)
            .with_body(body)
            .expect(hits)
            .create()
    }

    /// Serves `manifest` as the checksum file of `version`
    pub fn mock_checksums(&mut self, version: &str, manifest: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/download/v{}/checksums.txt", version).as_str())
            .with_status(200)
            .with_body(manifest)
            .expect(hits)
            .create()
    }

    /// Answers requests for `asset` of `version` with `status` and no body
    pub fn mock_status(&mut self, version: &str, asset: &str, status: usize) -> Mock {
        self.server
            .mock("GET", format!("/download/v{}/{}", version, asset).as_str())
            .with_status(status)
            .create()
    }

    /// Serves a consistent release: `body` plus a manifest listing its digest
    ///
    /// Returns `(asset mock, checksums mock)`, both expecting `hits` requests.
    pub fn mock_release(
        &mut self,
        version: &str,
        asset: &str,
        body: &[u8],
        hits: usize,
    ) -> (Mock, Mock) {
        let manifest = format!(
            "# al v{}\n{}",
            version,
            checksum_line(&sha256_hex(body), asset)
        );
        let asset_mock = self.mock_asset(version, asset, body, hits);
        let checksums_mock = self.mock_checksums(version, &manifest, hits);
        (asset_mock, checksums_mock)
    }
}

impl Default for ReleaseServer {
    fn default() -> Self {
        Self::new()
    }
}
