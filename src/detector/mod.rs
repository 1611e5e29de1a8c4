//! Detection layer
//!
//! Reads a project's dependency manifests and determines the version of the
//! tracked package it depends on.
//!
//! # Modules
//!
//! - [`error`]: Hard failures of strict single-file detection
//! - [`reader`]: Manifest reader with strict and lenient modes
//! - [`types`]: Detection outcome (`Found` / `NotFound(reason)`)

pub mod error;
pub mod reader;
pub mod types;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::{DetectorConfig, TRACKED_PACKAGE};
use crate::parser::{ManifestKind, ManifestParser, VersionSpecifier, parser_for};
use crate::version::cache::CachedRegistry;
use crate::version::catalog::VersionCatalog;
use crate::version::range::max_satisfying;
use crate::version::registries::NpmRegistry;
use crate::version::registry::Registry;
use crate::version::types::Channel;

pub use error::DetectError;
pub use reader::read_manifest;
pub use types::{Detection, NotFoundReason};

/// Detects the tracked package's version from a project's manifests
///
/// Detectors run in the fixed order of [`ManifestKind::PRIORITY`]: npm, pnpm
/// and yarn lockfiles first, package.json last. The first detector that finds
/// a version wins.
pub struct VersionDetector {
    parsers: Vec<Box<dyn ManifestParser>>,
    catalog: VersionCatalog,
}

impl VersionDetector {
    /// Create a detector for `package_name` backed by the given registry
    pub fn new(registry: Arc<dyn Registry>, package_name: &str) -> Self {
        Self {
            parsers: ManifestKind::PRIORITY.into_iter().map(parser_for).collect(),
            catalog: VersionCatalog::new(registry, package_name),
        }
    }

    /// Create a detector talking to the configured npm registry
    ///
    /// A positive `catalog_ttl_ms` wraps the registry in a [`CachedRegistry`].
    pub fn from_config(config: &DetectorConfig) -> Self {
        let npm: Arc<dyn Registry> = Arc::new(NpmRegistry::with_timeout(
            &config.registry_url,
            Duration::from_millis(config.fetch_timeout_ms),
        ));

        let registry: Arc<dyn Registry> = if config.catalog_ttl_ms > 0 {
            Arc::new(CachedRegistry::new(npm, config.catalog_ttl_ms))
        } else {
            npm
        };

        Self::new(registry, &config.package_name)
    }

    pub fn package_name(&self) -> &str {
        self.catalog.package_name()
    }

    /// Detect the version from whichever manifest of `working_dir` records it
    pub async fn detect_from_dependencies(&self, working_dir: &Path) -> Option<String> {
        self.detect_from_dependencies_outcome(working_dir)
            .await
            .into_version()
    }

    /// Like [`Self::detect_from_dependencies`], keeping the reason of the last miss
    pub async fn detect_from_dependencies_outcome(&self, working_dir: &Path) -> Detection {
        let mut last = Detection::NotFound(NotFoundReason::ManifestMissing);

        for parser in &self.parsers {
            let path = parser.kind().location(working_dir);
            let detection = match self.detect_with(parser.as_ref(), &path, false).await {
                Ok(detection) => detection,
                Err(e) => {
                    debug!("{}", e);
                    Detection::NotFound(NotFoundReason::ManifestMissing)
                }
            };

            if detection.is_found() {
                return detection;
            }

            if let Detection::NotFound(reason) = &detection {
                debug!(
                    "No {} version in {}: {}",
                    self.package_name(),
                    path.display(),
                    reason.as_str()
                );
            }

            // A manifest that exists explains the miss better than one that does not
            if !matches!(detection, Detection::NotFound(NotFoundReason::ManifestMissing)) {
                last = detection;
            }
        }

        last
    }

    /// Run the detector of one manifest format against `path`
    ///
    /// `strict` only governs reading: a missing or unreadable file is an error
    /// when set. Malformed content never is.
    pub async fn detect(
        &self,
        kind: ManifestKind,
        path: &Path,
        strict: bool,
    ) -> Result<Detection, DetectError> {
        let parser = parser_for(kind);
        self.detect_with(parser.as_ref(), path, strict).await
    }

    /// Detect the version from a package-lock.json
    pub async fn detect_from_npm_lockfile(
        &self,
        path: &Path,
        strict: bool,
    ) -> Result<Option<String>, DetectError> {
        Ok(self
            .detect(ManifestKind::NpmLockfile, path, strict)
            .await?
            .into_version())
    }

    /// Detect the version from a pnpm-lock.yaml
    pub async fn detect_from_pnpm_lockfile(
        &self,
        path: &Path,
        strict: bool,
    ) -> Result<Option<String>, DetectError> {
        Ok(self
            .detect(ManifestKind::PnpmLockfile, path, strict)
            .await?
            .into_version())
    }

    /// Detect the version from a yarn.lock
    pub async fn detect_from_yarn_lockfile(
        &self,
        path: &Path,
        strict: bool,
    ) -> Result<Option<String>, DetectError> {
        Ok(self
            .detect(ManifestKind::YarnLockfile, path, strict)
            .await?
            .into_version())
    }

    /// Detect the version from a package.json
    ///
    /// A range is resolved to the highest published version satisfying it.
    pub async fn detect_from_package_json(
        &self,
        path: &Path,
        strict: bool,
    ) -> Result<Option<String>, DetectError> {
        Ok(self
            .detect(ManifestKind::PackageJson, path, strict)
            .await?
            .into_version())
    }

    /// All published versions, highest first
    pub async fn get_all_versions(&self, include_prereleases: bool) -> Option<Vec<String>> {
        self.catalog.get_all_versions(include_prereleases).await
    }

    /// Highest published version on the given channel
    pub async fn get_latest_version(&self, channel: Channel) -> Option<String> {
        self.catalog.get_latest_version(channel).await
    }

    async fn detect_with(
        &self,
        parser: &dyn ManifestParser,
        path: &Path,
        strict: bool,
    ) -> Result<Detection, DetectError> {
        let Some(content) = read_manifest(path, strict).await? else {
            return Ok(Detection::NotFound(NotFoundReason::ManifestMissing));
        };

        let specifier = match parser.extract(&content, self.package_name()) {
            Ok(Some(specifier)) => specifier,
            Ok(None) => return Ok(Detection::NotFound(NotFoundReason::NotADependency)),
            Err(e) => {
                debug!("Ignoring {}: {}", path.display(), e);
                return Ok(Detection::NotFound(NotFoundReason::Malformed));
            }
        };

        // Lockfiles record the installed version
        if parser.kind().is_lockfile() {
            return Ok(Detection::Found(specifier));
        }

        Ok(self.resolve_specifier(&specifier).await)
    }

    /// Turn a package.json specifier into a concrete version
    async fn resolve_specifier(&self, raw: &str) -> Detection {
        match VersionSpecifier::classify(raw) {
            VersionSpecifier::Pinned(version) => Detection::Found(version),
            VersionSpecifier::Range(range) => {
                // Prereleases are kept; the range decides whether they qualify
                let Some(versions) = self.catalog.get_all_versions(true).await else {
                    return Detection::NotFound(NotFoundReason::Unresolved);
                };
                max_satisfying(&versions, &range).into()
            }
            VersionSpecifier::Unsupported(specifier) => {
                debug!("Unsupported version specifier {:?}", specifier);
                Detection::NotFound(NotFoundReason::InvalidSpecifier)
            }
        }
    }
}

impl Default for VersionDetector {
    fn default() -> Self {
        Self::new(Arc::new(NpmRegistry::default()), TRACKED_PACKAGE)
    }
}
