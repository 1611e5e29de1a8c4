//! npm semver ranges
//!
//! Supports the npm range grammar:
//! - `1.2.3`, `=1.2.3`, `v1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0-0)
//! - `~1.2.3`, `~>1.2.3` - approximately equivalent (>=1.2.3 <1.3.0-0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `1.2`, `1`, `*`, `""` - wildcards and partial versions
//! - `1.2.3 - 2.3.4` - hyphen ranges, with partial bounds
//! - `>=1.0.0 <2.0.0` - intersections (space-separated)
//! - `^1.0.0 || ^2.0.0` - unions
//!
//! A prerelease version only satisfies a comparator set when one of the
//! comparators in that set carries a prerelease on the same `major.minor.patch`.

use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

/// Whitespace between an operator and its version (`>= 1.2.3`)
static OPERATOR_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<=|>=|~>|<|>|=|\^|~)\s+").unwrap());

/// Hyphen range (`1.2.3 - 2.3.4`)
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+-\s+(\S+)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A primitive `<op><version>` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn test(&self, version: &Version) -> bool {
        match self.op {
            Op::Eq => version == &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
        }
    }
}

/// A version whose trailing components may be wildcards
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim_start_matches(['v', '=']);
        let spec = spec.split_once('+').map_or(spec, |(main, _build)| main);
        let (core, pre) = match spec.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (spec, None),
        };

        if core.is_empty() {
            return pre.is_none().then_some(Partial::any());
        }

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut components = [None; 3];
        let mut wildcard = false;
        for (slot, part) in components.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                wildcard = true;
                continue;
            }
            let value = parse_numeric_identifier(part)?;
            // Components after a wildcard are wildcards too (1.x.3 == 1.x)
            if !wildcard {
                *slot = Some(value);
            }
        }

        let [major, minor, patch] = components;
        let pre = match pre {
            // Prerelease tags require a fully specified version
            Some(pre) if patch.is_some() => Prerelease::new(pre).ok()?,
            Some(_) => return None,
            None => Prerelease::EMPTY,
        };

        Some(Partial {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn any() -> Self {
        Partial {
            major: None,
            minor: None,
            patch: None,
            pre: Prerelease::EMPTY,
        }
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    /// Lowest version matched by this partial
    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        }
    }

    /// First version above the wildcard part (`1.x` -> 2.0.0, `1.2` -> 1.3.0)
    fn next_after_wildcard(&self) -> Option<Version> {
        let major = self.major?;
        Some(match self.minor {
            None => Version::new(major + 1, 0, 0),
            Some(minor) => Version::new(major, minor + 1, 0),
        })
    }
}

/// Largest version component npm accepts (`Number.MAX_SAFE_INTEGER`)
const MAX_COMPONENT: u64 = (1 << 53) - 1;

/// Numeric semver identifier without leading zeros, at most [`MAX_COMPONENT`]
fn parse_numeric_identifier(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok().filter(|value| *value <= MAX_COMPONENT)
}

/// `<version>-0`: the lowest prerelease of a version, used for exclusive upper bounds
fn lowest_prerelease(version: Version) -> Version {
    Version {
        pre: Prerelease::new("0").unwrap_or(Prerelease::EMPTY),
        ..version
    }
}

/// Comparators that match nothing (`<0.0.0-0`)
fn impossible() -> Vec<Comparator> {
    vec![Comparator::new(
        Op::Lt,
        lowest_prerelease(Version::new(0, 0, 0)),
    )]
}

/// Intersection of comparators
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComparatorSet(Vec<Comparator>);

impl ComparatorSet {
    fn parse(spec: &str) -> Option<Self> {
        let spec = OPERATOR_SPACE_RE.replace_all(spec.trim(), "$1");

        if let Some(captures) = HYPHEN_RE.captures(&spec) {
            let from = Partial::parse(&captures[1])?;
            let to = Partial::parse(&captures[2])?;
            return Some(ComparatorSet(desugar_hyphen(&from, &to)));
        }

        let mut comparators = Vec::new();
        for token in spec.split_whitespace() {
            comparators.extend(desugar_token(token)?);
        }
        Some(ComparatorSet(comparators))
    }

    fn satisfies(&self, version: &Version) -> bool {
        if !self.0.iter().all(|c| c.test(version)) {
            return false;
        }

        if version.pre.is_empty() {
            return true;
        }

        self.0.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

fn desugar_token(token: &str) -> Option<Vec<Comparator>> {
    if let Some(rest) = token.strip_prefix('^') {
        Partial::parse(rest).map(|p| desugar_caret(&p))
    } else if let Some(rest) = token.strip_prefix("~>").or_else(|| token.strip_prefix('~')) {
        Partial::parse(rest).map(|p| desugar_tilde(&p))
    } else if let Some(rest) = token.strip_prefix(">=") {
        Partial::parse(rest).map(|p| desugar_primitive(Op::Gte, &p))
    } else if let Some(rest) = token.strip_prefix("<=") {
        Partial::parse(rest).map(|p| desugar_primitive(Op::Lte, &p))
    } else if let Some(rest) = token.strip_prefix('>') {
        Partial::parse(rest).map(|p| desugar_primitive(Op::Gt, &p))
    } else if let Some(rest) = token.strip_prefix('<') {
        Partial::parse(rest).map(|p| desugar_primitive(Op::Lt, &p))
    } else {
        Partial::parse(token).map(|p| desugar_primitive(Op::Eq, &p))
    }
}

/// ^1.2.3 -> >=1.2.3 <2.0.0-0
/// ^0.2.3 -> >=0.2.3 <0.3.0-0
/// ^0.0.3 -> >=0.0.3 <0.0.4-0
/// ^1.2   -> >=1.2.0 <2.0.0-0
/// ^0.0   -> >=0.0.0 <0.1.0-0
/// ^1     -> >=1.0.0 <2.0.0-0
fn desugar_caret(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };

    let upper = match (major, p.minor, p.patch) {
        (_, None, _) => Version::new(major + 1, 0, 0),
        (0, Some(0), Some(patch)) => Version::new(0, 0, patch + 1),
        (0, Some(minor), _) => Version::new(0, minor + 1, 0),
        _ => Version::new(major + 1, 0, 0),
    };

    vec![
        Comparator::new(Op::Gte, p.floor()),
        Comparator::new(Op::Lt, lowest_prerelease(upper)),
    ]
}

/// ~1.2.3 -> >=1.2.3 <1.3.0-0
/// ~1.2   -> >=1.2.0 <1.3.0-0
/// ~1     -> >=1.0.0 <2.0.0-0
fn desugar_tilde(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return Vec::new();
    };

    let upper = match p.minor {
        None => Version::new(major + 1, 0, 0),
        Some(minor) => Version::new(major, minor + 1, 0),
    };

    vec![
        Comparator::new(Op::Gte, p.floor()),
        Comparator::new(Op::Lt, lowest_prerelease(upper)),
    ]
}

/// Operator applied to a possibly partial version
fn desugar_primitive(op: Op, p: &Partial) -> Vec<Comparator> {
    if p.is_full() {
        return vec![Comparator::new(op, p.floor())];
    }

    let Some(next) = p.next_after_wildcard() else {
        // Bare wildcard: `*`, `>=*` and `<=*` match anything, `>*` and `<*` nothing
        return match op {
            Op::Gt | Op::Lt => impossible(),
            _ => Vec::new(),
        };
    };

    match op {
        // >1 -> >=2.0.0, >1.2 -> >=1.3.0
        Op::Gt => vec![Comparator::new(Op::Gte, next)],
        Op::Gte => vec![Comparator::new(Op::Gte, p.floor())],
        // <1.2 -> <1.2.0-0
        Op::Lt => vec![Comparator::new(Op::Lt, lowest_prerelease(p.floor()))],
        // <=1.2 -> <1.3.0-0
        Op::Lte => vec![Comparator::new(Op::Lt, lowest_prerelease(next))],
        // 1.2 -> >=1.2.0 <1.3.0-0
        Op::Eq => vec![
            Comparator::new(Op::Gte, p.floor()),
            Comparator::new(Op::Lt, lowest_prerelease(next)),
        ],
    }
}

/// 1.2.3 - 2.3.4 -> >=1.2.3 <=2.3.4
/// 1.2 - 2.3     -> >=1.2.0 <2.4.0-0
fn desugar_hyphen(from: &Partial, to: &Partial) -> Vec<Comparator> {
    let mut comparators = Vec::new();

    if from.major.is_some() {
        comparators.push(Comparator::new(Op::Gte, from.floor()));
    }

    if to.is_full() {
        comparators.push(Comparator::new(Op::Lte, to.floor()));
    } else if let Some(next) = to.next_after_wildcard() {
        comparators.push(Comparator::new(Op::Lt, lowest_prerelease(next)));
    }

    comparators
}

/// Parsed npm range: a union of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    sets: Vec<ComparatorSet>,
}

impl VersionRange {
    /// Parse a range expression, returning None for invalid syntax
    pub fn parse(spec: &str) -> Option<Self> {
        let sets = spec
            .split("||")
            .map(ComparatorSet::parse)
            .collect::<Option<Vec<_>>>()?;

        Some(Self { sets })
    }

    /// Check if a version satisfies any comparator set of this range
    pub fn satisfies(&self, version: &Version) -> bool {
        // Build metadata does not take part in precedence
        let version = Version {
            build: BuildMetadata::EMPTY,
            ..version.clone()
        };
        self.sets.iter().any(|set| set.satisfies(&version))
    }
}

/// Parse a strictly formed version, allowing surrounding whitespace and a `v` prefix
pub fn valid_version(spec: &str) -> Option<Version> {
    let spec = spec.trim();
    let spec = spec.strip_prefix('v').unwrap_or(spec);
    Version::parse(spec)
        .ok()
        .filter(|v| v.major.max(v.minor).max(v.patch) <= MAX_COMPONENT)
}

/// Parse a range expression
pub fn valid_range(spec: &str) -> Option<VersionRange> {
    VersionRange::parse(spec)
}

/// Highest candidate satisfying the range
///
/// Candidates that are not valid versions are skipped. Returns None when the
/// range is invalid or nothing satisfies it.
pub fn max_satisfying(candidates: &[String], range: &str) -> Option<String> {
    let range = VersionRange::parse(range)?;

    let mut best: Option<(Version, &String)> = None;
    for candidate in candidates {
        let Some(version) = valid_version(candidate) else {
            continue;
        };
        if !range.satisfies(&version) {
            continue;
        }
        if best.as_ref().is_none_or(|(max, _)| version > *max) {
            best = Some((version, candidate));
        }
    }

    best.map(|(_, candidate)| candidate.clone())
}
