//! Common types for the version layer

/// Published versions of a package, ordered from newest to oldest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersions {
    pub versions: Vec<String>,
}

impl PackageVersions {
    pub fn new(versions: Vec<String>) -> Self {
        Self { versions }
    }
}

/// Release channel used when asking for the latest version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Channel {
    /// Releases without a prerelease component
    #[default]
    Stable,
    /// Every release, including nightly prereleases
    Nightly,
}

impl Channel {
    pub fn includes_prereleases(&self) -> bool {
        matches!(self, Channel::Nightly)
    }
}
