use std::path::PathBuf;

use thiserror::Error;

/// Hard failures of the detection API
///
/// Only raised by single-file detection in strict mode. Everything else
/// surfaces as an absent version.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Unable to read lockfile at path {}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DetectError {
    /// Path of the manifest that caused the failure
    pub fn path(&self) -> &std::path::Path {
        match self {
            DetectError::ManifestUnreadable { path, .. } => path,
        }
    }
}
