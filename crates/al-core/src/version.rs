//! Release version model
//!
//! Versions are plain `X.Y.Z` triples. The literal `dev` marks an unreleased
//! local build: it never equals a release and can never be dispatched to.

use crate::error::{DispatchError, Result};
use std::fmt;

/// Sentinel reported by builds that were not produced by the release pipeline
pub const DEV: &str = "dev";

/// A released version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `vX.Y.Z` or `X.Y.Z`, ignoring surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DispatchError::VersionRequired);
        }

        let invalid = || DispatchError::InvalidVersion {
            raw: raw.to_string(),
        };

        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let mut parts = body.split('.');
        let mut next = || -> Result<u64> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Validates `raw` and returns it in canonical `X.Y.Z` form
pub fn normalize(raw: &str) -> Result<String> {
    Version::parse(raw).map(|v| v.to_string())
}

/// Reports whether `raw` is the dev sentinel
pub fn is_dev(raw: &str) -> bool {
    raw.trim() == DEV
}

/// Version of a build: either a release or the dev sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVersion {
    Dev,
    Release(Version),
}

impl BuildVersion {
    /// Parses a build's self-reported version, accepting the dev sentinel
    pub fn parse(raw: &str) -> Result<Self> {
        if is_dev(raw) {
            return Ok(BuildVersion::Dev);
        }
        Version::parse(raw)
            .map(BuildVersion::Release)
            .map_err(|e| DispatchError::InvalidBuildVersion {
                raw: raw.to_string(),
                source: Box::new(e),
            })
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, BuildVersion::Dev)
    }

    /// Returns the release version, or `None` for dev builds
    pub fn release(&self) -> Option<Version> {
        match self {
            BuildVersion::Dev => None,
            BuildVersion::Release(v) => Some(*v),
        }
    }
}

impl From<Version> for BuildVersion {
    fn from(version: Version) -> Self {
        BuildVersion::Release(version)
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildVersion::Dev => f.write_str(DEV),
            BuildVersion::Release(v) => v.fmt(f),
        }
    }
}
