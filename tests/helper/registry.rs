//! Registry test utilities

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use biome_version::VersionDetector;
use biome_version::version::error::RegistryError;
use biome_version::version::registry::Registry;
use biome_version::version::types::PackageVersions;

pub const PACKAGE: &str = "@biomejs/biome";

/// In-memory registry serving fixed version lists
#[derive(Default)]
pub struct StaticRegistry {
    versions: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, package: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for StaticRegistry {
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.versions.get(package_name) {
            Some(versions) => Ok(PackageVersions::new(versions.clone())),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// Detector over a registry publishing the given versions of the tracked package
pub fn detector_with_versions(versions: Vec<&str>) -> VersionDetector {
    let registry = StaticRegistry::new().with_versions(PACKAGE, versions);
    VersionDetector::new(Arc::new(registry), PACKAGE)
}

/// Detector whose registry knows nothing, so range resolution always fails
pub fn offline_detector() -> VersionDetector {
    VersionDetector::new(Arc::new(StaticRegistry::new()), PACKAGE)
}

/// Absolute path of a directory under `tests/fixtures`
pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}
