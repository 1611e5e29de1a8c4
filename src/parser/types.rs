//! Common types for parsers

use std::path::{Path, PathBuf};

use crate::version::range::{valid_range, valid_version};

/// Dependency manifest formats, in the order they are consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ManifestKind {
    /// npm lockfile (package-lock.json)
    #[value(name = "npm")]
    NpmLockfile,
    /// pnpm lockfile (pnpm-lock.yaml)
    #[value(name = "pnpm")]
    PnpmLockfile,
    /// yarn lockfile (yarn.lock)
    #[value(name = "yarn")]
    YarnLockfile,
    /// package.json
    #[value(name = "package-json")]
    PackageJson,
}

impl ManifestKind {
    /// Detection priority: lockfiles first, then package.json
    pub const PRIORITY: [ManifestKind; 4] = [
        ManifestKind::NpmLockfile,
        ManifestKind::PnpmLockfile,
        ManifestKind::YarnLockfile,
        ManifestKind::PackageJson,
    ];

    /// Conventional file name of the manifest
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::NpmLockfile => "package-lock.json",
            ManifestKind::PnpmLockfile => "pnpm-lock.yaml",
            ManifestKind::YarnLockfile => "yarn.lock",
            ManifestKind::PackageJson => "package.json",
        }
    }

    /// Location of the manifest inside a working directory
    pub fn location(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(self.file_name())
    }

    /// Lockfiles always record resolved versions
    pub fn is_lockfile(&self) -> bool {
        !matches!(self, ManifestKind::PackageJson)
    }
}

/// A version as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpecifier {
    /// Fully resolved version (1.6.3)
    Pinned(String),
    /// Semver range (^1.6.0, >=1.0.0 <2.0.0, 1.x)
    Range(String),
    /// Anything else (tags, workspace:, file:, git urls)
    Unsupported(String),
}

impl VersionSpecifier {
    /// Classifies a specifier purely from its syntax.
    ///
    /// A valid version wins over a valid range, since every pinned version
    /// is also a range matching only itself.
    pub fn classify(raw: &str) -> Self {
        if valid_version(raw).is_some() {
            VersionSpecifier::Pinned(raw.to_string())
        } else if valid_range(raw).is_some() {
            VersionSpecifier::Range(raw.to_string())
        } else {
            VersionSpecifier::Unsupported(raw.to_string())
        }
    }
}
