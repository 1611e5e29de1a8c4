use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Registry and package constants
// =============================================================================

/// Package whose version is detected
pub const TRACKED_PACKAGE: &str = "@biomejs/biome";

/// Default base URL for the npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Catalog cache lifetime in milliseconds. Zero disables the cache.
pub const DEFAULT_CATALOG_TTL_MS: i64 = 0;

/// Detector configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Dependency key looked up in every manifest
    pub package_name: String,
    /// Base URL of the npm-compatible registry
    pub registry_url: String,
    pub fetch_timeout_ms: u64,
    /// How long a fetched catalog is reused within one process
    pub catalog_ttl_ms: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            package_name: TRACKED_PACKAGE.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            catalog_ttl_ms: DEFAULT_CATALOG_TTL_MS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unable to read config file at path {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file at path {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl DetectorConfig {
    /// Loads a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for biome-version.
/// Uses $XDG_DATA_HOME/biome-version if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/biome-version,
/// or ./biome-version if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("biome-version.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("biome-version")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detector_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<DetectorConfig>(json!({
            "registryUrl": "http://localhost:4873"
        }))
        .unwrap();

        assert_eq!(result.registry_url, "http://localhost:4873");
        assert_eq!(result.package_name, TRACKED_PACKAGE);
        assert_eq!(result.fetch_timeout_ms, FETCH_TIMEOUT_MS);
        assert_eq!(result.catalog_ttl_ms, 0);
    }

    #[test]
    fn detector_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<DetectorConfig>(json!({
            "packageName": "@biomejs/cli",
            "registryUrl": "http://localhost:4873",
            "fetchTimeoutMs": 500,
            "catalogTtlMs": 60000
        }))
        .unwrap();

        assert_eq!(
            result,
            DetectorConfig {
                package_name: "@biomejs/cli".to_string(),
                registry_url: "http://localhost:4873".to_string(),
                fetch_timeout_ms: 500,
                catalog_ttl_ms: 60000,
            }
        );
    }

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biome-version.json");
        std::fs::write(&path, r#"{ "catalogTtlMs": 1000 }"#).unwrap();

        let config = DetectorConfig::load(&path).unwrap();

        assert_eq!(config.catalog_ttl_ms, 1000);
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result = DetectorConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = DetectorConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/biome-version"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/biome-version"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./biome-version"));
    }
}
