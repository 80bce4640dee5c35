#![deny(missing_docs)]

//! # Document Nodes
//!
//! The generic decoded node abstraction shared by every decoder in the crate.
//! Nodes come straight from `serde_yaml`, so mappings keep insertion order.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A decoded document node (scalar, sequence or mapping).
pub type Node = serde_yaml::Value;

/// An insertion-ordered mapping of facet name to arbitrary node.
pub type Facets = IndexMap<String, Node>;

/// Returns the YAML long tag describing the kind of `node`.
///
/// Used in error messages, e.g. `tag:yaml.org,2002:seq`.
pub fn long_tag(node: &Node) -> String {
    let short = match node {
        Node::Null => "null",
        Node::Bool(_) => "bool",
        Node::Number(n) => {
            if n.is_f64() {
                "float"
            } else {
                "int"
            }
        }
        Node::String(_) => "str",
        Node::Sequence(_) => "seq",
        Node::Mapping(_) => "map",
        Node::Tagged(tagged) => return tagged.tag.to_string(),
    };
    format!("tag:yaml.org,2002:{}", short)
}

/// Returns the text of a scalar node, or `None` for null and collections.
pub fn scalar_text(node: &Node) -> Option<String> {
    match node {
        Node::String(s) => Some(s.clone()),
        Node::Bool(b) => Some(b.to_string()),
        Node::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts a YAML mapping into string-keyed facets.
///
/// Non-string scalar keys (`200:` in a responses map) are rendered as text.
pub fn mapping_to_facets(mapping: &serde_yaml::Mapping) -> AppResult<Facets> {
    let mut facets = Facets::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = scalar_text(key).ok_or_else(|| {
            AppError::Decode(format!(
                "mapping key must be a scalar, found {}",
                long_tag(key)
            ))
        })?;
        facets.insert(name, value.clone());
    }
    Ok(facets)
}

/// Converts string-keyed facets back into a YAML mapping.
pub fn facets_to_mapping(facets: &Facets) -> serde_yaml::Mapping {
    facets
        .iter()
        .map(|(k, v)| (Node::String(k.clone()), v.clone()))
        .collect()
}

/// Deserializes a mapping into [`Facets`], accepting non-string scalar keys.
///
/// A missing or null value yields empty facets.
pub fn deserialize_facets<'de, D>(deserializer: D) -> Result<Facets, D::Error>
where
    D: Deserializer<'de>,
{
    match Node::deserialize(deserializer)? {
        Node::Null => Ok(Facets::new()),
        Node::Mapping(mapping) => mapping_to_facets(&mapping).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected a mapping, found {}",
            long_tag(&other)
        ))),
    }
}

/// Deserializes an optional scalar facet as text (`displayName: 5` -> `"5"`).
pub fn deserialize_scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let node = Node::deserialize(deserializer)?;
    if node.is_null() {
        return Ok(None);
    }
    scalar_text(&node).map(Some).ok_or_else(|| {
        D::Error::custom(format!("expected a scalar, found {}", long_tag(&node)))
    })
}
