//! Handing control to another `al` binary
//!
//! Two strategies:
//! - [`ExecReplace`] (Unix): replaces the current process image
//! - [`SpawnRelay`] (everywhere): runs a child, then exits with its code
//!
//! Both report success the same way, by returning [`Handoff`].

use al_core::{DispatchError, Result};
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// Marker that control was handed to another binary
///
/// Callers that receive it must stop without doing any more work.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff;

/// Strategy for running the dispatched binary in place of this one
pub trait ProcessHandoff: Send + Sync {
    /// Runs `path` with `args` (argv[1..]) and exactly the variables in `env`
    ///
    /// `exit` terminates the current process; strategies that keep this
    /// process alive call it with the child's exit code.
    fn handoff(
        &self,
        path: &Path,
        args: &[OsString],
        env: &[(OsString, OsString)],
        exit: &dyn Fn(i32),
    ) -> Result<Handoff>;
}

/// `execve` into the target; on success this process image is gone
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecReplace;

#[cfg(unix)]
impl ProcessHandoff for ExecReplace {
    fn handoff(
        &self,
        path: &Path,
        args: &[OsString],
        env: &[(OsString, OsString)],
        _exit: &dyn Fn(i32),
    ) -> Result<Handoff> {
        use std::os::unix::process::CommandExt;

        debug!("exec {}", path.display());
        let source = Command::new(path)
            .args(args)
            .env_clear()
            .envs(env.iter().map(|(k, v)| (k, v)))
            .exec();

        // exec only returns on failure
        Err(DispatchError::Exec {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Spawn the target with inherited stdio, wait, and exit with its code
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnRelay;

impl ProcessHandoff for SpawnRelay {
    fn handoff(
        &self,
        path: &Path,
        args: &[OsString],
        env: &[(OsString, OsString)],
        exit: &dyn Fn(i32),
    ) -> Result<Handoff> {
        debug!("spawn {}", path.display());
        let status = Command::new(path)
            .args(args)
            .env_clear()
            .envs(env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DispatchError::Spawn {
                path: path.to_path_buf(),
                source: e,
            })?;

        // No code means the child was killed by a signal
        let code = status.code().unwrap_or(1);
        debug!("{} exited with {}", path.display(), code);
        exit(code);
        Ok(Handoff)
    }
}

/// Handoff strategy for the current platform
pub fn default_handoff() -> Box<dyn ProcessHandoff> {
    #[cfg(unix)]
    {
        Box::new(ExecReplace)
    }
    #[cfg(not(unix))]
    {
        Box::new(SpawnRelay)
    }
}
