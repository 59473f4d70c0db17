use al_core::config::env::VERSION_OVERRIDE;
use al_core::pin::read_pinned_version;
use al_core::{BuildVersion, DispatchError, EnvSource, Result, Version};
use log::debug;
use std::fmt;
use std::path::Path;

/// Where the requested version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// `AL_VERSION` environment variable
    Override,
    /// `.agent-layer/al.version` in the project
    Pin,
    /// The running binary's own version
    Current,
}

impl VersionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionSource::Override => "override",
            VersionSource::Pin => "pin",
            VersionSource::Current => "current",
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of version resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub target: BuildVersion,
    pub source: VersionSource,
}

/// Picks the version to run: override, then pin, then the current build
///
/// The pin is only read when `project_root` is known. Malformed overrides and
/// pins are errors rather than being skipped.
pub fn resolve_requested_version(
    env: &dyn EnvSource,
    project_root: Option<&Path>,
    current: BuildVersion,
) -> Result<Resolution> {
    if let Some(raw) = env.non_empty(VERSION_OVERRIDE) {
        let version = Version::parse(&raw).map_err(|e| DispatchError::InvalidOverride {
            var: VERSION_OVERRIDE,
            source: Box::new(e),
        })?;
        debug!("{} requests {}", VERSION_OVERRIDE, version);
        return Ok(Resolution {
            target: BuildVersion::Release(version),
            source: VersionSource::Override,
        });
    }

    if let Some(root) = project_root
        && let Some(version) = read_pinned_version(root)?
    {
        debug!("{} pins {}", root.display(), version);
        return Ok(Resolution {
            target: BuildVersion::Release(version),
            source: VersionSource::Pin,
        });
    }

    Ok(Resolution {
        target: current,
        source: VersionSource::Current,
    })
}
