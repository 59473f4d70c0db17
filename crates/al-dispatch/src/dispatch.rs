//! Version dispatch orchestration
//!
//! [`Dispatcher::maybe_exec`] runs once at startup. It decides whether this
//! binary is the version the project asked for and, if not, hands control to
//! the right one from the cache.
//!
//! # Flow
//!
//! 1. Validate the invocation and parse the build version
//! 2. Locate the project root and resolve the requested version
//! 3. Same version: continue without touching the cache or network
//! 4. Refuse re-entrant dispatch and dispatch to `dev`
//! 5. Ensure the binary is cached, then hand off with `AL_SHIM_ACTIVE=1`

use crate::cache::{BinaryCache, entry_path};
use crate::exec::{Handoff, ProcessHandoff, default_handoff};
use crate::host::{Host, SystemHost};
use crate::release::ReleaseSource;
use crate::resolve::{Resolution, resolve_requested_version};
use al_core::config::cache::SUBDIR;
use al_core::config::env::{
    CACHE_DIR, NO_NETWORK, SHIM_ACTIVE, SHIM_ACTIVE_VALUE, VERSION_OVERRIDE,
};
use al_core::root::find_project_root;
use al_core::{BuildVersion, DispatchError, EnvSource, ProcessEnv, Result, Version};
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One program start, as seen by the dispatcher
pub struct Invocation<'a> {
    /// Full argv, including argv[0]
    pub args: &'a [OsString],
    /// Version this binary was built as (`X.Y.Z`, `vX.Y.Z`, or `dev`)
    pub build_version: &'a str,
    pub cwd: &'a Path,
    /// Terminates the process; used when the handoff keeps this process alive
    pub exit: Option<&'a dyn Fn(i32)>,
}

/// What the caller should do after [`Dispatcher::maybe_exec`]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This binary is the requested version; run normally
    Continue,
    /// Another binary ran in our place; stop immediately
    Dispatched(Handoff),
}

/// Read-only view of what dispatch would do from a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchStatus {
    pub current: BuildVersion,
    pub project_root: Option<PathBuf>,
    pub resolution: Resolution,
    pub cache_root: Option<PathBuf>,
    /// Expected binary location, when the target is a release on a supported platform
    pub cache_path: Option<PathBuf>,
    pub cached: bool,
}

impl DispatchStatus {
    /// Whether running from here would hand off to another binary
    pub fn would_dispatch(&self) -> bool {
        self.resolution.target != self.current
    }
}

pub struct Dispatcher {
    env: Box<dyn EnvSource>,
    host: Box<dyn Host>,
    handoff: Box<dyn ProcessHandoff>,
    release: ReleaseSource,
    user_cache_dir: Option<PathBuf>,
}

impl Dispatcher {
    /// Dispatcher wired to the real environment, filesystem, and network
    pub fn system() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Dispatches to the requested version if it is not this binary
    pub fn maybe_exec(&self, invocation: Invocation<'_>) -> Result<Outcome> {
        if invocation.args.is_empty() {
            return Err(DispatchError::MissingArgv0);
        }
        if invocation.cwd.as_os_str().is_empty() {
            return Err(DispatchError::WorkingDirRequired);
        }
        let exit = invocation.exit.ok_or(DispatchError::ExitHandlerRequired)?;

        let current = BuildVersion::parse(invocation.build_version)?;
        let project_root = find_project_root(invocation.cwd)?;
        let resolution =
            resolve_requested_version(self.env.as_ref(), project_root.as_deref(), current)?;
        debug!(
            "current {}, requested {} ({})",
            current, resolution.target, resolution.source
        );

        if resolution.target == current {
            return Ok(Outcome::Continue);
        }
        if self.env.is_set(SHIM_ACTIVE) {
            return Err(DispatchError::DispatchAlreadyActive {
                current: current.to_string(),
                requested: resolution.target.to_string(),
            });
        }
        let requested = release_target(resolution.target)?;

        let cache_root = self.cache_root()?;
        let path = BinaryCache::new(self.host.as_ref(), &self.release)
            .offline(self.env.is_set(NO_NETWORK))
            .ensure(&cache_root, requested)?;

        let env = self.child_env();
        let args = &invocation.args[1..];
        info!("Dispatching to al {} at {}", requested, path.display());
        let handoff = self.handoff.handoff(&path, args, &env, exit)?;
        Ok(Outcome::Dispatched(handoff))
    }

    /// Cache root: `AL_CACHE_DIR`, else `<user cache dir>/agent-layer`
    ///
    /// A relative `AL_CACHE_DIR` is resolved against the process working
    /// directory.
    pub fn cache_root(&self) -> Result<PathBuf> {
        if let Some(dir) = self.env.non_empty(CACHE_DIR) {
            return std::path::absolute(&dir)
                .map_err(|e| DispatchError::io("resolve cache dir", dir, e));
        }
        self.user_cache_dir
            .as_ref()
            .map(|base| base.join(SUBDIR))
            .ok_or(DispatchError::CacheDirUnavailable { var: CACHE_DIR })
    }

    /// Reports what [`Dispatcher::maybe_exec`] would resolve from `cwd`
    ///
    /// Never downloads. The cache path is only probed for existence.
    pub fn status(&self, cwd: &Path, build_version: &str) -> Result<DispatchStatus> {
        let current = BuildVersion::parse(build_version)?;
        let project_root = find_project_root(cwd)?;
        let resolution =
            resolve_requested_version(self.env.as_ref(), project_root.as_deref(), current)?;
        let cache_root = self.cache_root().ok();

        let cache_path = match (&cache_root, resolution.target.release()) {
            (Some(root), Some(version)) => self
                .host
                .platform()
                .ok()
                .map(|platform| entry_path(root, version, platform)),
            _ => None,
        };
        let cached = match &cache_path {
            Some(path) => self
                .host
                .exists(path)
                .map_err(|e| DispatchError::io("check cached binary", path, e))?,
            None => false,
        };

        Ok(DispatchStatus {
            current,
            project_root,
            resolution,
            cache_root,
            cache_path,
            cached,
        })
    }

    /// Inherited environment with the re-entrancy marker set
    fn child_env(&self) -> Vec<(OsString, OsString)> {
        let mut env: Vec<(OsString, OsString)> = self
            .env
            .vars()
            .into_iter()
            .filter(|(key, _)| key != SHIM_ACTIVE)
            .collect();
        env.push((SHIM_ACTIVE.into(), SHIM_ACTIVE_VALUE.into()));
        env
    }
}

/// Narrows a dispatch target to a release; `dev` is refused
fn release_target(target: BuildVersion) -> Result<Version> {
    match target {
        BuildVersion::Release(version) => Ok(version),
        BuildVersion::Dev => Err(DispatchError::CannotDispatchToDev {
            var: VERSION_OVERRIDE,
        }),
    }
}

/// Builder for [`Dispatcher`]; unset parts fall back to the real system
#[derive(Default)]
pub struct DispatcherBuilder {
    env: Option<Box<dyn EnvSource>>,
    host: Option<Box<dyn Host>>,
    handoff: Option<Box<dyn ProcessHandoff>>,
    release: Option<ReleaseSource>,
    user_cache_dir: Option<Option<PathBuf>>,
}

impl DispatcherBuilder {
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    pub fn host(mut self, host: impl Host + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn handoff(mut self, handoff: impl ProcessHandoff + 'static) -> Self {
        self.handoff = Some(Box::new(handoff));
        self
    }

    pub fn release(mut self, release: ReleaseSource) -> Self {
        self.release = Some(release);
        self
    }

    /// Overrides the platform user cache directory; `None` means unavailable
    pub fn user_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_cache_dir = Some(dir);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let host: Box<dyn Host> = match self.host {
            Some(host) => host,
            None => Box::new(SystemHost::new()),
        };
        let release = match self.release {
            Some(release) => release,
            None => ReleaseSource::github()?,
        };

        Ok(Dispatcher {
            env: self.env.unwrap_or_else(|| Box::new(ProcessEnv)),
            host,
            handoff: self.handoff.unwrap_or_else(default_handoff),
            release,
            user_cache_dir: self.user_cache_dir.unwrap_or_else(dirs::cache_dir),
        })
    }
}

/// Runs dispatch for this process with the real system wiring
///
/// Returns [`Outcome::Dispatched`] when another binary ran; the caller must
/// then return without doing anything else.
pub fn maybe_exec(
    args: &[OsString],
    build_version: &str,
    cwd: &Path,
    exit: &dyn Fn(i32),
) -> Result<Outcome> {
    Dispatcher::system()?.maybe_exec(Invocation {
        args,
        build_version,
        cwd,
        exit: Some(exit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_core::MapEnv;
    use std::cell::RefCell;

    /// Fails the test if dispatch gets as far as a handoff
    struct NoHandoff;

    impl ProcessHandoff for NoHandoff {
        fn handoff(
            &self,
            _path: &Path,
            _args: &[OsString],
            _env: &[(OsString, OsString)],
            _exit: &dyn Fn(i32),
        ) -> Result<Handoff> {
            panic!("handoff must not be reached");
        }
    }

    fn dispatcher(env: MapEnv) -> Dispatcher {
        Dispatcher::builder()
            .env(env)
            .handoff(NoHandoff)
            .user_cache_dir(None)
            .build()
            .unwrap()
    }

    fn args() -> Vec<OsString> {
        vec![OsString::from("al"), OsString::from("sync")]
    }

    #[test]
    fn test_missing_argv0() {
        let d = dispatcher(MapEnv::new());
        let err = d
            .maybe_exec(Invocation {
                args: &[],
                build_version: "1.0.0",
                cwd: Path::new("/"),
                exit: Some(&|_| {}),
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingArgv0));
    }

    #[test]
    fn test_missing_cwd() {
        let d = dispatcher(MapEnv::new());
        let err = d
            .maybe_exec(Invocation {
                args: &args(),
                build_version: "1.0.0",
                cwd: Path::new(""),
                exit: Some(&|_| {}),
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::WorkingDirRequired));
    }

    #[test]
    fn test_missing_exit_handler() {
        let d = dispatcher(MapEnv::new());
        let err = d
            .maybe_exec(Invocation {
                args: &args(),
                build_version: "1.0.0",
                cwd: Path::new("/"),
                exit: None,
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::ExitHandlerRequired));
    }

    #[test]
    fn test_invalid_build_version() {
        let d = dispatcher(MapEnv::new());
        let err = d
            .maybe_exec(Invocation {
                args: &args(),
                build_version: "nightly",
                cwd: Path::new("/"),
                exit: Some(&|_| {}),
            })
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidBuildVersion { .. }));
    }

    #[test]
    fn test_release_target_refuses_dev() {
        let err = release_target(BuildVersion::Dev).unwrap_err();
        match err {
            DispatchError::CannotDispatchToDev { var } => assert_eq!(var, "AL_VERSION"),
            other => panic!("expected CannotDispatchToDev, got {:?}", other),
        }
    }

    #[test]
    fn test_release_target_release() {
        let target = BuildVersion::Release(Version::new(2, 1, 0));
        assert_eq!(release_target(target).unwrap(), Version::new(2, 1, 0));
    }

    #[test]
    fn test_cache_root_prefers_env() {
        let d = Dispatcher::builder()
            .env(MapEnv::new().with("AL_CACHE_DIR", "  /tmp/al-cache  "))
            .handoff(NoHandoff)
            .user_cache_dir(Some(PathBuf::from("/home/u/.cache")))
            .build()
            .unwrap();
        assert_eq!(d.cache_root().unwrap(), PathBuf::from("/tmp/al-cache"));
    }

    #[test]
    fn test_relative_cache_root_is_made_absolute() {
        let d = Dispatcher::builder()
            .env(MapEnv::new().with("AL_CACHE_DIR", "rel/al-cache"))
            .handoff(NoHandoff)
            .user_cache_dir(None)
            .build()
            .unwrap();

        let root = d.cache_root().unwrap();
        assert!(root.is_absolute(), "got {}", root.display());
        assert_eq!(root, std::env::current_dir().unwrap().join("rel/al-cache"));
    }

    #[test]
    fn test_cache_root_falls_back_to_user_cache() {
        let d = Dispatcher::builder()
            .env(MapEnv::new())
            .handoff(NoHandoff)
            .user_cache_dir(Some(PathBuf::from("/home/u/.cache")))
            .build()
            .unwrap();
        assert_eq!(
            d.cache_root().unwrap(),
            PathBuf::from("/home/u/.cache").join("agent-layer")
        );
    }

    #[test]
    fn test_cache_root_unavailable() {
        let d = dispatcher(MapEnv::new());
        assert!(matches!(
            d.cache_root(),
            Err(DispatchError::CacheDirUnavailable {
                var: "AL_CACHE_DIR"
            })
        ));
    }

    #[test]
    fn test_child_env_sets_marker_once() {
        let d = dispatcher(
            MapEnv::new()
                .with("AL_SHIM_ACTIVE", "0")
                .with("HOME", "/home/u"),
        );
        let env = d.child_env();

        let markers: Vec<_> = env.iter().filter(|(k, _)| k == "AL_SHIM_ACTIVE").collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].1, "1");
        assert!(env.iter().any(|(k, v)| k == "HOME" && v == "/home/u"));
    }

    #[test]
    fn test_exit_handler_not_called_on_continue() {
        let calls = RefCell::new(Vec::new());
        let d = dispatcher(MapEnv::new());
        let outcome = d
            .maybe_exec(Invocation {
                args: &args(),
                build_version: "dev",
                cwd: Path::new("/"),
                exit: Some(&|c| calls.borrow_mut().push(c)),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Continue);
        assert!(calls.borrow().is_empty());
    }
}
