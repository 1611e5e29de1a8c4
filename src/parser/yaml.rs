//! Minimal YAML document reader built on tree-sitter
//!
//! Lockfiles only need structural access (nested mappings of scalars), so the
//! syntax tree is folded into a small ordered value type instead of being
//! deserialized into typed structs.

use indexmap::IndexMap;
use tracing::debug;

use crate::parser::traits::ParseError;

/// Structural view of a YAML node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlValue {
    /// Mapping with keys in document order
    Mapping(IndexMap<String, YamlValue>),
    Sequence(Vec<YamlValue>),
    Scalar(String),
    Null,
}

impl YamlValue {
    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        match self {
            YamlValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            YamlValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, YamlValue>> {
        match self {
            YamlValue::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

/// Parse the first document of a YAML stream
pub fn parse_document(content: &str) -> Result<YamlValue, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    let language = tree_sitter_yaml::LANGUAGE;
    parser.set_language(&language.into()).map_err(|e| {
        debug!("Failed to set YAML language for tree-sitter: {}", e);
        ParseError::TreeSitter(e.to_string())
    })?;

    let tree = parser.parse(content, None).ok_or_else(|| {
        debug!("Failed to parse YAML content");
        ParseError::ParseFailed("Failed to parse YAML".to_string())
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseError::InvalidSyntax(format!(
            "YAML syntax error near line {}",
            first_error_line(root).map_or(0, |row| row + 1)
        )));
    }

    let mut cursor = root.walk();
    let document = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == "document");

    Ok(document.map_or(YamlValue::Null, |doc| fold_node(doc, content)))
}

fn first_error_line(node: tree_sitter::Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }

    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

/// Node kinds that annotate a value without being the value
fn is_decoration(kind: &str) -> bool {
    matches!(kind, "comment" | "anchor" | "tag" | "yaml_directive" | "tag_directive")
}

fn fold_node(node: tree_sitter::Node, content: &str) -> YamlValue {
    match node.kind() {
        "document" | "block_node" | "flow_node" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| !is_decoration(child.kind()));
            inner.map_or(YamlValue::Null, |child| fold_node(child, content))
        }
        "block_mapping" => fold_pairs(node, "block_mapping_pair", content),
        "flow_mapping" => fold_pairs(node, "flow_pair", content),
        "block_sequence" | "flow_sequence" => {
            let mut cursor = node.walk();
            let items = node
                .named_children(&mut cursor)
                .filter(|child| !is_decoration(child.kind()))
                .map(|child| fold_node(child, content))
                .collect();
            YamlValue::Sequence(items)
        }
        "block_sequence_item" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| !is_decoration(child.kind()));
            inner.map_or(YamlValue::Null, |child| fold_node(child, content))
        }
        "plain_scalar" | "block_scalar" => {
            YamlValue::Scalar(content[node.byte_range()].trim().to_string())
        }
        "double_quote_scalar" => {
            YamlValue::Scalar(unquote_double(&content[node.byte_range()]))
        }
        "single_quote_scalar" => {
            YamlValue::Scalar(unquote_single(&content[node.byte_range()]))
        }
        _ => YamlValue::Null,
    }
}

fn fold_pairs(node: tree_sitter::Node, pair_kind: &str, content: &str) -> YamlValue {
    let mut map = IndexMap::new();
    let mut cursor = node.walk();

    for pair in node.named_children(&mut cursor) {
        if pair.kind() != pair_kind {
            continue;
        }

        let Some(key_node) = pair.child_by_field_name("key") else {
            continue;
        };

        let YamlValue::Scalar(key) = fold_node(key_node, content) else {
            continue;
        };

        let value = pair
            .child_by_field_name("value")
            .map_or(YamlValue::Null, |value_node| fold_node(value_node, content));

        map.insert(key, value);
    }

    YamlValue::Mapping(map)
}

fn unquote_double(text: &str) -> String {
    let inner = text
        .trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

fn unquote_single(text: &str) -> String {
    text.trim()
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(text)
        .replace("''", "'")
}
