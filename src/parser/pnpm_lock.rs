//! pnpm-lock.yaml parser

use crate::parser::traits::{ManifestParser, ParseError};
use crate::parser::types::ManifestKind;
use crate::parser::yaml::{YamlValue, parse_document};

/// Parser for pnpm lockfiles
pub struct PnpmLockParser;

impl PnpmLockParser {
    pub fn new() -> Self {
        Self
    }

    /// Dependency groupings, most specific first
    const DEPENDENCY_FIELDS: [&'static str; 2] = ["devDependencies", "dependencies"];

    /// Importer holding the root project since lockfile v9
    const ROOT_IMPORTER: &'static str = ".";

    /// Find the locked version within one document scope
    ///
    /// Entries are either `{ specifier, version }` mappings (v6 and later)
    /// or bare version scalars (v5).
    fn find_in_scope(scope: &YamlValue, package_name: &str) -> Option<String> {
        Self::DEPENDENCY_FIELDS.iter().find_map(|field| {
            let entry = scope.get(field)?.get(package_name)?;
            let raw = match entry {
                YamlValue::Scalar(version) => version.as_str(),
                YamlValue::Mapping(_) => entry.get("version")?.as_str()?,
                _ => return None,
            };
            Self::strip_peer_suffix(raw)
        })
    }

    /// `1.6.3(typescript@5.4.0)` records peer resolutions after the version
    fn strip_peer_suffix(raw: &str) -> Option<String> {
        let version = raw.split('(').next().unwrap_or(raw).trim();
        if version.is_empty() {
            None
        } else {
            Some(version.to_string())
        }
    }
}

impl Default for PnpmLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for PnpmLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PnpmLockfile
    }

    fn extract(&self, content: &str, package_name: &str) -> Result<Option<String>, ParseError> {
        let document = parse_document(content)?;

        let version = Self::find_in_scope(&document, package_name).or_else(|| {
            let root = document.get("importers")?.get(Self::ROOT_IMPORTER)?;
            Self::find_in_scope(root, package_name)
        });

        Ok(version)
    }
}
