//! Version catalog of the tracked package
//!
//! Every failure while fetching collapses to `None`: callers only learn
//! whether a catalog is available, never why it is not.

use std::sync::Arc;

use tracing::debug;

use crate::version::range::valid_version;
use crate::version::registry::Registry;
use crate::version::semver::{is_prerelease, sort_descending};
use crate::version::types::Channel;

/// Published versions of one package, fetched on every call
#[derive(Clone)]
pub struct VersionCatalog {
    registry: Arc<dyn Registry>,
    package_name: String,
}

impl VersionCatalog {
    pub fn new(registry: Arc<dyn Registry>, package_name: &str) -> Self {
        Self {
            registry,
            package_name: package_name.to_string(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// All published versions, highest first
    ///
    /// Prerelease versions are dropped unless `include_prereleases` is set.
    pub async fn get_all_versions(&self, include_prereleases: bool) -> Option<Vec<String>> {
        let fetched = match self.registry.fetch_all_versions(&self.package_name).await {
            Ok(fetched) => fetched,
            Err(e) => {
                debug!("Unable to fetch versions of {}: {}", self.package_name, e);
                return None;
            }
        };

        let versions = fetched
            .versions
            .iter()
            .filter_map(|v| valid_version(v))
            .filter(|v| include_prereleases || !is_prerelease(v))
            .collect();

        Some(
            sort_descending(versions)
                .into_iter()
                .map(|v| v.to_string())
                .collect(),
        )
    }

    /// Highest published version on the given channel
    pub async fn get_latest_version(&self, channel: Channel) -> Option<String> {
        self.get_all_versions(channel.includes_prereleases())
            .await?
            .into_iter()
            .next()
    }
}
