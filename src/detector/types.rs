//! Detection outcome types

/// Why a detector produced no version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The manifest file does not exist or cannot be read
    ManifestMissing,
    /// The manifest is not valid for its format
    Malformed,
    /// The manifest does not list the tracked package
    NotADependency,
    /// The specifier is neither a version nor a range
    InvalidSpecifier,
    /// The range could not be resolved against the registry
    Unresolved,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundReason::ManifestMissing => "manifest missing",
            NotFoundReason::Malformed => "manifest malformed",
            NotFoundReason::NotADependency => "not a dependency",
            NotFoundReason::InvalidSpecifier => "unsupported version specifier",
            NotFoundReason::Unresolved => "range not resolved",
        }
    }
}

/// Result of running one detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Found(String),
    NotFound(NotFoundReason),
}

impl Detection {
    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found(_))
    }

    /// Collapse the outcome into the public `Option` form
    pub fn into_version(self) -> Option<String> {
        match self {
            Detection::Found(version) => Some(version),
            Detection::NotFound(_) => None,
        }
    }
}

impl From<Option<String>> for Detection {
    fn from(version: Option<String>) -> Self {
        match version {
            Some(version) => Detection::Found(version),
            None => Detection::NotFound(NotFoundReason::Unresolved),
        }
    }
}
