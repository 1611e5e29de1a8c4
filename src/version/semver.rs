use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

/// Finds the first `major[.minor[.patch]][-prerelease][+build]` run in a string
static COERCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:-((?:\d+|\d*[a-zA-Z-][a-zA-Z0-9-]*)(?:\.(?:\d+|\d*[a-zA-Z-][a-zA-Z0-9-]*))*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:$|[^\d])",
    )
    .unwrap()
});

/// Coerce a loosely formed version identifier into a strict semver version.
///
/// Missing minor and patch components become zero, surrounding text is
/// ignored, the prerelease is kept and build metadata is dropped.
///
/// Examples:
/// - "1.6.3" -> 1.6.3
/// - "v1.6" -> 1.6.0
/// - "1.8.4-nightly.a579bf7" -> 1.8.4-nightly.a579bf7
/// - "release-2" -> 2.0.0
/// - "latest" -> None
pub fn coerce_version(raw: &str) -> Option<Version> {
    let captures = COERCE_RE.captures(raw)?;

    let component = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let pre = match captures.get(4) {
        Some(m) => Prerelease::new(m.as_str()).ok()?,
        None => Prerelease::EMPTY,
    };

    Some(Version {
        major: component(1)?,
        minor: component(2)?,
        patch: component(3)?,
        pre,
        build: BuildMetadata::EMPTY,
    })
}

/// Whether the version carries a prerelease component
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

/// Sort versions by semver precedence, highest first, dropping duplicates
pub fn sort_descending(mut versions: Vec<Version>) -> Vec<Version> {
    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();
    versions
}
