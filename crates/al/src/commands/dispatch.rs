//! `al dispatch status` - show how this directory resolves

use crate::build_info;
use al_dispatch::{DispatchStatus, Dispatcher};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct StatusInfo {
    current_version: String,
    requested_version: String,
    source: String,
    would_dispatch: bool,
    project_root: Option<String>,
    cache_root: Option<String>,
    binary_path: Option<String>,
    cached: bool,
}

impl From<&DispatchStatus> for StatusInfo {
    fn from(status: &DispatchStatus) -> Self {
        let display = |p: &Path| p.display().to_string();
        Self {
            current_version: status.current.to_string(),
            requested_version: status.resolution.target.to_string(),
            source: status.resolution.source.to_string(),
            would_dispatch: status.would_dispatch(),
            project_root: status.project_root.as_deref().map(display),
            cache_root: status.cache_root.as_deref().map(display),
            binary_path: status.cache_path.as_deref().map(display),
            cached: status.cached,
        }
    }
}

/// Execute `al dispatch status`
pub fn execute_status(json: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dispatcher = Dispatcher::system()?;
    let status = dispatcher.status(&cwd, build_info::VERSION)?;
    let info = StatusInfo::from(&status);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Dispatch Status");
    println!("===============");
    println!();
    println!("Current:   {}", info.current_version);
    println!(
        "Requested: {} ({})",
        info.requested_version, info.source
    );
    println!(
        "Project:   {}",
        info.project_root.as_deref().unwrap_or("(none)")
    );
    println!(
        "Cache:     {}",
        info.cache_root.as_deref().unwrap_or("(unavailable)")
    );

    if let Some(path) = &info.binary_path {
        let state = if info.cached {
            "cached".green()
        } else {
            "not cached".yellow()
        };
        println!("Binary:    {} [{}]", path, state);
    }

    if !info.would_dispatch {
        println!();
        println!("This binary is the requested version.");
    }

    Ok(())
}
