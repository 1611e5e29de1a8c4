//! Parser trait definition

use crate::parser::types::ManifestKind;

/// Trait for extracting a dependency version from one manifest format
pub trait ManifestParser: Send + Sync {
    /// Returns the manifest format this parser handles
    fn kind(&self) -> ManifestKind;

    /// Extract the version recorded for `package_name`
    ///
    /// # Returns
    /// * `Ok(Some(version))` - The raw version or range as written
    /// * `Ok(None)` - The content is well-formed but does not list the package
    /// * `Err(ParseError)` - The content is not valid for this format
    fn extract(&self, content: &str, package_name: &str) -> Result<Option<String>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::InvalidSyntax(e.to_string())
    }
}
