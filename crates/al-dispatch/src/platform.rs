use al_core::config::release::ASSET_PREFIX;
use al_core::{DispatchError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Os {
    /// Canonical name used in release asset names
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        }
    }
}

impl Arch {
    /// Canonical name used in release asset names
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Supported OS/architecture pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Platform of the running binary
    pub fn current() -> Result<Self> {
        Self::from_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps Rust target names (`std::env::consts`) to a supported platform
    pub fn from_target(os: &str, arch: &str) -> Result<Self> {
        let os = match os {
            "macos" => Os::Darwin,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => return Err(DispatchError::UnsupportedOs(other.to_string())),
        };
        let arch = match arch {
            "x86_64" => Arch::Amd64,
            "aarch64" => Arch::Arm64,
            other => return Err(DispatchError::UnsupportedArch(other.to_string())),
        };
        Ok(Self { os, arch })
    }

    /// Release asset file name, e.g. `al-linux-amd64` or `al-windows-arm64.exe`
    pub fn asset_name(&self) -> String {
        let name = format!("{}-{}-{}", ASSET_PREFIX, self.os.as_str(), self.arch.as_str());
        if self.os == Os::Windows {
            format!("{}.exe", name)
        } else {
            name
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        let supported = matches!(std::env::consts::OS, "macos" | "linux" | "windows")
            && matches!(std::env::consts::ARCH, "x86_64" | "aarch64");
        assert_eq!(Platform::current().is_ok(), supported);
    }

    #[test]
    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    fn test_current_linux_amd64() {
        assert_eq!(
            Platform::current().unwrap(),
            Platform::new(Os::Linux, Arch::Amd64)
        );
    }

    #[test]
    fn test_from_target_maps_names() {
        let p = Platform::from_target("macos", "aarch64").unwrap();
        assert_eq!(p, Platform::new(Os::Darwin, Arch::Arm64));
        assert_eq!(p.to_string(), "darwin-arm64");
    }

    #[test]
    fn test_from_target_rejects_unsupported_os() {
        let err = Platform::from_target("freebsd", "x86_64").unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedOs(ref os) if os == "freebsd"));
    }

    #[test]
    fn test_from_target_rejects_unsupported_arch() {
        let err = Platform::from_target("linux", "riscv64").unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedArch(ref arch) if arch == "riscv64"));
    }

    #[test]
    fn test_asset_name_linux() {
        let p = Platform::new(Os::Linux, Arch::Amd64);
        assert_eq!(p.asset_name(), "al-linux-amd64");
    }

    #[test]
    fn test_asset_name_darwin() {
        let p = Platform::new(Os::Darwin, Arch::Arm64);
        assert_eq!(p.asset_name(), "al-darwin-arm64");
    }

    #[test]
    fn test_asset_name_windows_has_exe() {
        assert_eq!(
            Platform::new(Os::Windows, Arch::Amd64).asset_name(),
            "al-windows-amd64.exe"
        );
        assert_eq!(
            Platform::new(Os::Windows, Arch::Arm64).asset_name(),
            "al-windows-arm64.exe"
        );
    }
}
