//! package-lock.json parser

use serde::Deserialize;
use serde_json::Value;

use crate::parser::traits::{ManifestParser, ParseError};
use crate::parser::types::ManifestKind;

/// Parser for npm lockfiles
pub struct PackageLockParser;

/// Sections that are `null` or not objects lock nothing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageLock {
    /// lockfileVersion 2 and 3: keyed by install path
    packages: Value,
    /// lockfileVersion 1: keyed by package name
    dependencies: Value,
}

impl PackageLockParser {
    pub fn new() -> Self {
        Self
    }

    /// Install path of a top-level package
    fn install_path(package_name: &str) -> String {
        format!("node_modules/{}", package_name)
    }
}

impl Default for PackageLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for PackageLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::NpmLockfile
    }

    fn extract(&self, content: &str, package_name: &str) -> Result<Option<String>, ParseError> {
        let lockfile: PackageLock = serde_json::from_str(content)?;

        let locked_version = |entry: Option<&Value>| {
            entry?.get("version")?.as_str().map(str::to_string)
        };

        let version = locked_version(
            lockfile
                .packages
                .get(Self::install_path(package_name).as_str()),
        )
        .or_else(|| locked_version(lockfile.dependencies.get(package_name)));

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = "@biomejs/biome";

    #[test]
    fn extract_reads_version_from_packages_section() {
        let content = r#"{
            "name": "app",
            "lockfileVersion": 3,
            "packages": {
                "": {
                    "name": "app",
                    "devDependencies": { "@biomejs/biome": "^1.6.0" }
                },
                "node_modules/@biomejs/biome": {
                    "version": "1.6.3",
                    "dev": true,
                    "hasInstallScript": true
                },
                "node_modules/@biomejs/cli-linux-x64": {
                    "version": "1.6.3",
                    "optional": true
                }
            }
        }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, Some("1.6.3".to_string()));
    }

    #[test]
    fn extract_falls_back_to_v1_dependencies_section() {
        let content = r#"{
            "lockfileVersion": 1,
            "dependencies": {
                "@biomejs/biome": { "version": "1.6.3", "dev": true }
            }
        }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, Some("1.6.3".to_string()));
    }

    #[test]
    fn extract_ignores_nested_installs() {
        let content = r#"{
            "packages": {
                "node_modules/other/node_modules/@biomejs/biome": { "version": "1.0.0" }
            }
        }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn extract_returns_none_when_entry_has_no_version() {
        let content = r#"{ "packages": { "node_modules/@biomejs/biome": { "link": true } } }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn extract_skips_null_packages_section() {
        let content = r#"{
            "lockfileVersion": 1,
            "packages": null,
            "dependencies": {
                "@biomejs/biome": { "version": "1.6.3" }
            }
        }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, Some("1.6.3".to_string()));
    }

    #[test]
    fn extract_returns_none_when_sections_are_not_objects() {
        let content = r#"{ "packages": "none", "dependencies": null }"#;

        let result = PackageLockParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn extract_fails_on_malformed_json() {
        let result = PackageLockParser::new().extract("not json", PACKAGE);

        assert!(result.is_err());
    }
}
