//! Project version pin (`.agent-layer/al.version`)

use crate::config::project::{METADATA_DIR, PIN_FILE};
use crate::error::{DispatchError, Result};
use crate::version::Version;
use std::io;
use std::path::{Path, PathBuf};

/// Location of the pin file for a project root
pub fn pin_path(root: &Path) -> PathBuf {
    root.join(METADATA_DIR).join(PIN_FILE)
}

/// Reads and normalizes the pinned version for `root`
///
/// A missing file means "no pin". An empty file is a misconfiguration and
/// fails, as does a pin that is not a valid version.
pub fn read_pinned_version(root: &Path) -> Result<Option<Version>> {
    let path = pin_path(root);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DispatchError::io("read pin file", path, e)),
    };
    let data = match String::from_utf8(bytes) {
        Ok(data) => data,
        Err(e) => {
            return Err(DispatchError::InvalidPin {
                path,
                source: Box::new(DispatchError::InvalidVersion {
                    raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                }),
            });
        }
    };

    let raw = data.trim();
    if raw.is_empty() {
        return Err(DispatchError::EmptyPin { path });
    }

    Version::parse(raw)
        .map(Some)
        .map_err(|e| DispatchError::InvalidPin {
            path,
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_pin(contents: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".agent-layer")).unwrap();
        if let Some(contents) = contents {
            fs::write(pin_path(temp.path()), contents).unwrap();
        }
        temp
    }

    #[test]
    fn test_missing_pin_is_none() {
        let temp = project_with_pin(None);
        assert_eq!(read_pinned_version(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_pin_is_normalized() {
        let temp = project_with_pin(Some("v0.9.0\n"));
        assert_eq!(
            read_pinned_version(temp.path()).unwrap(),
            Some(Version::new(0, 9, 0))
        );
    }

    #[test]
    fn test_whitespace_pin_is_empty_error() {
        let temp = project_with_pin(Some("  \n\t\n"));
        let err = read_pinned_version(temp.path()).unwrap_err();
        assert!(matches!(err, DispatchError::EmptyPin { .. }));
        assert!(err.to_string().contains("al.version"));
    }

    #[test]
    fn test_malformed_pin_names_file() {
        let temp = project_with_pin(Some("latest"));
        let err = read_pinned_version(temp.path()).unwrap_err();
        match &err {
            DispatchError::InvalidPin { path, .. } => assert_eq!(path, &pin_path(temp.path())),
            other => panic!("expected InvalidPin, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_pin_is_invalid() {
        let temp = project_with_pin(None);
        fs::write(pin_path(temp.path()), b"v1.\xff.0\n").unwrap();

        let err = read_pinned_version(temp.path()).unwrap_err();
        match &err {
            DispatchError::InvalidPin { path, .. } => assert_eq!(path, &pin_path(temp.path())),
            other => panic!("expected InvalidPin, got {:?}", other),
        }
        assert!(err.to_string().starts_with("PIN_INVALID"), "{}", err);
    }

    #[test]
    fn test_pin_path_layout() {
        let path = pin_path(Path::new("/repo"));
        assert!(path.ends_with(".agent-layer/al.version"));
    }
}
