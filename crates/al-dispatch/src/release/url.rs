//! URL construction for release assets

use al_core::config::release::{BASE_URL, CHECKSUMS_FILE};
use al_core::{DispatchError, Result, Version};
use url::Url;

/// Base URL that versioned release downloads hang off
///
/// Assets live at `<base>/download/v<version>/<asset>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    base: Url,
}

impl ReleaseSource {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| DispatchError::ReleaseUrl(format!("{}: {}", base, e)))?;
        if base.cannot_be_a_base() {
            return Err(DispatchError::ReleaseUrl(format!(
                "URL cannot be a base: {}",
                base
            )));
        }
        Ok(Self { base })
    }

    /// Official GitHub releases of `al`
    pub fn github() -> Result<Self> {
        Self::new(BASE_URL)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of a release binary
    pub fn asset_url(&self, version: Version, asset: &str) -> Result<Url> {
        self.versioned(version, asset)
    }

    /// URL of the checksum manifest for a release
    pub fn checksums_url(&self, version: Version) -> Result<Url> {
        self.versioned(version, CHECKSUMS_FILE)
    }

    fn versioned(&self, version: Version, file: &str) -> Result<Url> {
        let tag = format!("v{}", version);
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DispatchError::ReleaseUrl(format!("URL cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(["download", tag.as_str(), file]);
        Ok(url)
    }
}
