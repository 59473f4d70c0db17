//! Self re-exec of the `al` CLI into a requested release.
//!
//! The entry point is [`maybe_exec`] (or [`Dispatcher::maybe_exec`] for custom
//! wiring). It resolves the requested version, fetches and verifies the
//! binary into a per-user cache if needed, and hands the process over to it.
//!
//! - [`resolve`]: override, pin, and current version precedence
//! - [`cache`]: versioned binary cache with locked, verified installs
//! - [`release`]: release URLs, downloads, and checksum manifests
//! - [`exec`]: exec-in-place and spawn-and-relay handoff
//! - [`host`]: filesystem and HTTP primitives behind a trait
//! - [`platform`]: OS/architecture mapping and asset names

pub mod cache;
pub mod dispatch;
pub mod exec;
pub mod host;
pub mod platform;
pub mod release;
pub mod resolve;

pub use cache::BinaryCache;
pub use dispatch::{DispatchStatus, Dispatcher, DispatcherBuilder, Invocation, Outcome, maybe_exec};
pub use exec::{Handoff, ProcessHandoff, SpawnRelay, default_handoff};
#[cfg(unix)]
pub use exec::ExecReplace;
pub use host::{Host, HttpResponse, SystemHost};
pub use platform::{Arch, Os, Platform};
pub use release::ReleaseSource;
pub use resolve::{Resolution, VersionSource, resolve_requested_version};
