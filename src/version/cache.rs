//! Time-bounded in-memory catalog cache
//!
//! Wraps another [`Registry`] and reuses fetched catalogs until they are older
//! than the configured lifetime. Nothing is persisted: the cache lives exactly
//! as long as the value that owns it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::PackageVersions;

struct CachedEntry {
    fetched_at: DateTime<Utc>,
    versions: PackageVersions,
}

/// Registry decorator caching catalogs per package name
pub struct CachedRegistry {
    inner: Arc<dyn Registry>,
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, CachedEntry>>,
}

impl CachedRegistry {
    /// Cache catalogs fetched through `inner` for `ttl_ms` milliseconds
    pub fn new(inner: Arc<dyn Registry>, ttl_ms: i64) -> Self {
        Self {
            inner,
            ttl: TimeDelta::milliseconds(ttl_ms),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, package_name: &str, now: DateTime<Utc>) -> Option<PackageVersions> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(package_name)?;

        if now - entry.fetched_at < self.ttl {
            Some(entry.versions.clone())
        } else {
            None
        }
    }

    fn store(&self, package_name: &str, versions: &PackageVersions, now: DateTime<Utc>) {
        // A poisoned lock only costs a refetch
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                package_name.to_string(),
                CachedEntry {
                    fetched_at: now,
                    versions: versions.clone(),
                },
            );
        }
    }
}

#[async_trait::async_trait]
impl Registry for CachedRegistry {
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        if let Some(versions) = self.lookup(package_name, Utc::now()) {
            debug!("Using cached catalog for {}", package_name);
            return Ok(versions);
        }

        let versions = self.inner.fetch_all_versions(package_name).await?;
        self.store(package_name, &versions, Utc::now());

        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::registry::MockRegistry;

    fn versions() -> PackageVersions {
        PackageVersions::new(vec!["1.6.4".to_string(), "1.6.3".to_string()])
    }

    #[tokio::test]
    async fn fetch_all_versions_reuses_fresh_catalog() {
        let mut inner = MockRegistry::new();
        inner
            .expect_fetch_all_versions()
            .times(1)
            .returning(|_| Ok(versions()));

        let cached = CachedRegistry::new(Arc::new(inner), 60_000);

        let first = cached.fetch_all_versions("@biomejs/biome").await.unwrap();
        let second = cached.fetch_all_versions("@biomejs/biome").await.unwrap();

        assert_eq!(first, versions());
        assert_eq!(second, versions());
    }

    #[tokio::test]
    async fn fetch_all_versions_refetches_with_zero_ttl() {
        let mut inner = MockRegistry::new();
        inner
            .expect_fetch_all_versions()
            .times(2)
            .returning(|_| Ok(versions()));

        let cached = CachedRegistry::new(Arc::new(inner), 0);

        cached.fetch_all_versions("@biomejs/biome").await.unwrap();
        cached.fetch_all_versions("@biomejs/biome").await.unwrap();
    }

    #[tokio::test]
    async fn fetch_all_versions_does_not_cache_errors() {
        let mut inner = MockRegistry::new();
        let mut calls = 0;
        inner
            .expect_fetch_all_versions()
            .times(2)
            .returning(move |name| {
                calls += 1;
                if calls == 1 {
                    Err(RegistryError::NotFound(name.to_string()))
                } else {
                    Ok(versions())
                }
            });

        let cached = CachedRegistry::new(Arc::new(inner), 60_000);

        assert!(cached.fetch_all_versions("@biomejs/biome").await.is_err());
        assert_eq!(
            cached.fetch_all_versions("@biomejs/biome").await.unwrap(),
            versions()
        );
    }

    #[test]
    fn lookup_ignores_expired_entries() {
        let cached = CachedRegistry::new(Arc::new(MockRegistry::new()), 1_000);
        let fetched_at = Utc::now();
        cached.store("@biomejs/biome", &versions(), fetched_at);

        assert_eq!(
            cached.lookup("@biomejs/biome", fetched_at + TimeDelta::milliseconds(500)),
            Some(versions())
        );
        assert_eq!(
            cached.lookup("@biomejs/biome", fetched_at + TimeDelta::milliseconds(1_500)),
            None
        );
    }
}
