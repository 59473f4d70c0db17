//! CLI command implementations

pub mod dispatch;
