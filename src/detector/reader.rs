//! Manifest file reader

use std::path::Path;

use tracing::debug;

use crate::detector::error::DetectError;

/// Read a manifest as UTF-8 text
///
/// A missing, unreadable or non-UTF-8 file is an error in strict mode and
/// `Ok(None)` otherwise.
pub async fn read_manifest(path: &Path, strict: bool) -> Result<Option<String>, DetectError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(source) if strict => Err(DetectError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) => {
            debug!("Skipping unreadable manifest {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn read_manifest_returns_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{}").unwrap();

        let result = read_manifest(&path, true).await.unwrap();

        assert_eq!(result, Some("{}".to_string()));
    }

    #[tokio::test]
    async fn read_manifest_fails_for_missing_file_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package-lock.json");

        let err = read_manifest(&path, true).await.unwrap_err();

        assert_eq!(err.path(), path.as_path());
        assert_eq!(
            err.to_string(),
            format!("Unable to read lockfile at path {}", path.display())
        );
    }

    #[tokio::test]
    async fn read_manifest_returns_none_for_missing_file_in_lenient_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package-lock.json");

        assert_eq!(read_manifest(&path, false).await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_manifest_treats_invalid_utf8_as_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("yarn.lock");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        assert!(read_manifest(&path, true).await.is_err());
        assert_eq!(read_manifest(&path, false).await.unwrap(), None);
    }
}
