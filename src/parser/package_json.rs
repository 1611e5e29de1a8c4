//! package.json parser

use serde::Deserialize;
use serde_json::Value;

use crate::parser::traits::{ManifestParser, ParseError};
use crate::parser::types::ManifestKind;

/// Parser for package.json files
pub struct PackageJsonParser;

/// The dependency groupings of a package.json
///
/// Kept as raw values: a group that is `null` or not an object holds nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PackageManifest {
    dependencies: Value,
    dev_dependencies: Value,
}

impl PackageJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for PackageJsonParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PackageJson
    }

    fn extract(&self, content: &str, package_name: &str) -> Result<Option<String>, ParseError> {
        let manifest: PackageManifest = serde_json::from_str(content)?;

        // devDependencies take precedence over dependencies
        let specifier = [&manifest.dev_dependencies, &manifest.dependencies]
            .into_iter()
            .find_map(|group| group.get(package_name).and_then(Value::as_str))
            .filter(|specifier| !specifier.trim().is_empty())
            .map(|specifier| specifier.trim().to_string());

        Ok(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PACKAGE: &str = "@biomejs/biome";

    #[rstest]
    #[case(r#"{"devDependencies": {"@biomejs/biome": "1.6.3"}}"#, Some("1.6.3"))]
    #[case(r#"{"dependencies": {"@biomejs/biome": "1.6.3"}}"#, Some("1.6.3"))]
    #[case(r#"{"dependencies": {"@biomejs/biome": "^1.6.0"}}"#, Some("^1.6.0"))]
    #[case(
        r#"{"dependencies": {"@biomejs/biome": "1.5.0"}, "devDependencies": {"@biomejs/biome": "1.6.3"}}"#,
        Some("1.6.3")
    )]
    #[case(r#"{"dependencies": {"lodash": "^4.17.21"}}"#, None)]
    #[case(r#"{"name": "app"}"#, None)]
    #[case(r#"{"devDependencies": {"@biomejs/biome": ""}}"#, None)]
    fn extract_returns_expected(#[case] content: &str, #[case] expected: Option<&str>) {
        let result = PackageJsonParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, expected.map(str::to_string));
    }

    #[test]
    fn extract_ignores_non_string_specifiers() {
        let content = r#"{"devDependencies": {"@biomejs/biome": 1}, "dependencies": {"@biomejs/biome": "1.6.3"}}"#;

        let result = PackageJsonParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, Some("1.6.3".to_string()));
    }

    #[rstest]
    #[case(r#"{"devDependencies": null, "dependencies": {"@biomejs/biome": "1.6.3"}}"#)]
    #[case(r#"{"devDependencies": "none", "dependencies": {"@biomejs/biome": "1.6.3"}}"#)]
    #[case(r#"{"devDependencies": ["@biomejs/biome"], "dependencies": {"@biomejs/biome": "1.6.3"}}"#)]
    fn extract_skips_groups_that_are_not_objects(#[case] content: &str) {
        let result = PackageJsonParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, Some("1.6.3".to_string()));
    }

    #[test]
    fn extract_returns_none_when_every_group_is_null() {
        let content = r#"{"devDependencies": null, "dependencies": null}"#;

        let result = PackageJsonParser::new().extract(content, PACKAGE).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn extract_fails_on_malformed_json() {
        let result = PackageJsonParser::new().extract("{ \"dependencies\": ", PACKAGE);

        assert!(matches!(result, Err(ParseError::InvalidSyntax(_))));
    }
}
