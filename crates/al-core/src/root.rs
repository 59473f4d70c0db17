//! Project root discovery

use crate::config::project::METADATA_DIR;
use crate::error::{DispatchError, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Walks upward from `start` looking for a directory containing `.agent-layer/`
///
/// Returns `Ok(None)` when the filesystem root is reached without a match.
/// A relative `start` is resolved against the process working directory.
pub fn find_project_root(start: &Path) -> Result<Option<PathBuf>> {
    if start.as_os_str().is_empty() {
        return Err(DispatchError::WorkingDirRequired);
    }
    let start = std::path::absolute(start)
        .map_err(|e| DispatchError::io("resolve path", start, e))?;

    for dir in start.ancestors() {
        let candidate = dir.join(METADATA_DIR);
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_dir() => return Ok(Some(dir.to_path_buf())),
            Ok(_) => return Err(DispatchError::ProjectPathNotDir { path: candidate }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DispatchError::io("check path", candidate, e)),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_root_in_start_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".agent-layer")).unwrap();

        let root = find_project_root(temp.path()).unwrap();
        assert_eq!(root.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_finds_root_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".agent-layer")).unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_metadata_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".agent-layer"), "not a dir").unwrap();

        let result = find_project_root(temp.path());
        assert!(matches!(
            result,
            Err(DispatchError::ProjectPathNotDir { .. })
        ));
    }

    #[test]
    fn test_empty_start_is_rejected() {
        assert!(matches!(
            find_project_root(Path::new("")),
            Err(DispatchError::WorkingDirRequired)
        ));
    }
}
