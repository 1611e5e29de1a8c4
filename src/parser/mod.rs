//! Parser layer
//! - traits.rs: ManifestParser trait definition
//! - types.rs: Common types (ManifestKind, VersionSpecifier)
//! - yaml.rs: tree-sitter backed YAML reader shared by the YAML lockfiles
//! - package_json.rs: package.json parser
//! - package_lock.rs: package-lock.json parser
//! - pnpm_lock.rs: pnpm-lock.yaml parser
//! - yarn_lock.rs: yarn.lock parser

pub mod package_json;
pub mod package_lock;
pub mod pnpm_lock;
pub mod traits;
pub mod types;
pub mod yaml;
pub mod yarn_lock;

pub use package_json::PackageJsonParser;
pub use package_lock::PackageLockParser;
pub use pnpm_lock::PnpmLockParser;
pub use traits::{ManifestParser, ParseError};
pub use types::{ManifestKind, VersionSpecifier};
pub use yarn_lock::YarnLockParser;

/// Create the parser for a manifest format
pub fn parser_for(kind: ManifestKind) -> Box<dyn ManifestParser> {
    match kind {
        ManifestKind::NpmLockfile => Box::new(PackageLockParser::new()),
        ManifestKind::PnpmLockfile => Box::new(PnpmLockParser::new()),
        ManifestKind::YarnLockfile => Box::new(YarnLockParser::new()),
        ManifestKind::PackageJson => Box::new(PackageJsonParser::new()),
    }
}
