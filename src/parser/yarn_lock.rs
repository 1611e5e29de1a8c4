//! yarn.lock parser
//!
//! Handles both lockfile generations:
//! - yarn berry (v2+): a YAML document keyed by `name@range` descriptors
//! - yarn classic (v1): a YAML-like format with `version "x.y.z"` lines

use semver::Version;

use crate::parser::traits::{ManifestParser, ParseError};
use crate::parser::types::ManifestKind;
use crate::parser::yaml::parse_document;

/// Header written by yarn classic
const CLASSIC_HEADER: &str = "# yarn lockfile v1";

/// Parser for yarn lockfiles
pub struct YarnLockParser;

impl YarnLockParser {
    pub fn new() -> Self {
        Self
    }

    fn is_classic(content: &str) -> bool {
        content
            .lines()
            .take_while(|line| line.is_empty() || line.starts_with('#'))
            .any(|line| line.trim() == CLASSIC_HEADER)
    }

    /// Whether an entry key (one or more comma-separated descriptors) names the package
    fn key_matches(key: &str, package_name: &str) -> bool {
        let prefix = format!("{}@", package_name);
        key.split(',')
            .map(|descriptor| descriptor.trim().trim_matches('"'))
            .any(|descriptor| descriptor.starts_with(&prefix))
    }

    /// Resolved versions of every berry entry that names the package
    fn berry_candidates(content: &str, package_name: &str) -> Result<Vec<String>, ParseError> {
        let document = parse_document(content)?;
        let Some(entries) = document.as_mapping() else {
            return Ok(Vec::new());
        };

        Ok(entries
            .iter()
            .filter(|(key, _)| Self::key_matches(key, package_name))
            .filter_map(|(_, entry)| entry.get("version")?.as_str().map(str::to_string))
            .collect())
    }

    /// Resolved versions of every classic entry that names the package
    fn classic_candidates(content: &str, package_name: &str) -> Result<Vec<String>, ParseError> {
        let mut candidates = Vec::new();
        let mut in_match = false;

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if !line.starts_with(' ') {
                let Some(key) = trimmed.strip_suffix(':') else {
                    return Err(ParseError::InvalidSyntax(format!(
                        "expected an entry header on line {}",
                        index + 1
                    )));
                };
                in_match = Self::key_matches(key, package_name);
                continue;
            }

            // Field lines of the entry are indented by exactly two spaces
            if in_match
                && !line.starts_with("   ")
                && let Some(value) = trimmed.strip_prefix("version ")
            {
                candidates.push(value.trim().trim_matches('"').to_string());
            }
        }

        Ok(candidates)
    }

    /// Pick the highest resolved version; ties and unparseable versions keep document order
    fn highest_resolved(candidates: Vec<String>) -> Option<String> {
        let mut best: Option<(Option<Version>, String)> = None;

        for candidate in candidates {
            let parsed = Version::parse(&candidate).ok();
            let replace = match &best {
                None => true,
                Some((best_parsed, _)) => parsed > *best_parsed,
            };
            if replace {
                best = Some((parsed, candidate));
            }
        }

        best.map(|(_, version)| version)
    }
}

impl Default for YarnLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for YarnLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::YarnLockfile
    }

    fn extract(&self, content: &str, package_name: &str) -> Result<Option<String>, ParseError> {
        let candidates = if Self::is_classic(content) {
            Self::classic_candidates(content, package_name)?
        } else {
            Self::berry_candidates(content, package_name)?
        };

        Ok(Self::highest_resolved(candidates))
    }
}
