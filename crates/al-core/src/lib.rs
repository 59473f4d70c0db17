//! Core building blocks for `al` version dispatch.
//!
//! - [`version`]: release version model and the `dev` sentinel
//! - [`root`]: project root discovery (`.agent-layer/`)
//! - [`pin`]: project version pin reader
//! - [`lock`]: cross-process advisory file locks
//! - [`env`]: environment access behind [`env::EnvSource`]
//! - [`config`]: environment names, layout, and release constants

pub mod config;
pub mod env;
pub mod error;
pub mod lock;
pub mod pin;
pub mod root;
pub mod version;

// Re-export commonly used types
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{DispatchError, Result};
pub use version::{BuildVersion, Version};
