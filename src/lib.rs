//! Detects which version of Biome (`@biomejs/biome`) a project depends on.
//!
//! Lockfiles are consulted first (npm, pnpm, yarn), then `package.json`. A
//! range found in `package.json` is resolved to the highest published version
//! on the npm registry that satisfies it.
//!
//! The free functions below use the public npm registry and the default
//! tracked package. Build a [`VersionDetector`] to use another registry or
//! package, or to inject a cached registry.

pub mod config;
pub mod detector;
pub mod parser;
pub mod version;

use std::path::Path;

pub use detector::{DetectError, Detection, NotFoundReason, VersionDetector};
pub use parser::ManifestKind;
pub use version::types::Channel;

/// Detect the version from the manifests in `working_dir`
///
/// Never fails: a directory without a usable manifest yields `None`.
pub async fn detect_from_dependencies(working_dir: impl AsRef<Path>) -> Option<String> {
    VersionDetector::default()
        .detect_from_dependencies(working_dir.as_ref())
        .await
}

/// Detect the version from a package-lock.json, failing if it cannot be read
pub async fn detect_from_npm_lockfile(
    path: impl AsRef<Path>,
) -> Result<Option<String>, DetectError> {
    VersionDetector::default()
        .detect_from_npm_lockfile(path.as_ref(), true)
        .await
}

/// Detect the version from a pnpm-lock.yaml, failing if it cannot be read
pub async fn detect_from_pnpm_lockfile(
    path: impl AsRef<Path>,
) -> Result<Option<String>, DetectError> {
    VersionDetector::default()
        .detect_from_pnpm_lockfile(path.as_ref(), true)
        .await
}

/// Detect the version from a yarn.lock, failing if it cannot be read
pub async fn detect_from_yarn_lockfile(
    path: impl AsRef<Path>,
) -> Result<Option<String>, DetectError> {
    VersionDetector::default()
        .detect_from_yarn_lockfile(path.as_ref(), true)
        .await
}

/// Detect the version from a package.json, failing if it cannot be read
pub async fn detect_from_package_json(
    path: impl AsRef<Path>,
) -> Result<Option<String>, DetectError> {
    VersionDetector::default()
        .detect_from_package_json(path.as_ref(), true)
        .await
}

/// Latest published version on the given channel
pub async fn get_latest_version(channel: Channel) -> Option<String> {
    VersionDetector::default().get_latest_version(channel).await
}

/// All published versions, highest first
pub async fn get_all_versions(include_prereleases: bool) -> Option<Vec<String>> {
    VersionDetector::default()
        .get_all_versions(include_prereleases)
        .await
}
