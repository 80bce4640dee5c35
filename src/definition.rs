#![deny(missing_docs)]

//! # Definition Choices
//!
//! Resource types, traits and security schemes are applied by name, either
//! bare (`is: [secured]`) or with parameters (`is: [paged: { size: 10 }]`).
//! The shape of the node decides which; a mapping must hold exactly one key.

use crate::error::{AppError, AppResult};
use crate::node::{long_tag, mapping_to_facets, scalar_text, Facets, Node};
use serde::Deserialize;

/// Parameter name to value, as given when applying a definition.
pub type DefinitionParameters = Facets;

/// "Apply definition `name` with these parameters".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Node")]
pub enum DefinitionChoice {
    /// A bare name without parameters.
    Bare(String),
    /// A single-key mapping of name to parameters.
    Parameterized {
        /// The definition name.
        name: String,
        /// The parameters, possibly empty.
        parameters: DefinitionParameters,
    },
}

impl DefinitionChoice {
    /// Decodes one document node.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Decode` naming the node kind for null, sequence and
    /// tagged nodes, and for mappings that do not have exactly one key.
    pub fn from_node(node: &Node) -> AppResult<Self> {
        match node {
            Node::Mapping(mapping) => {
                let mut entries = mapping.iter();
                let (Some((key, value)), None) = (entries.next(), entries.next()) else {
                    return Err(AppError::Decode(format!(
                        "definition choice {} must have exactly one key, found {}",
                        long_tag(node),
                        mapping.len()
                    )));
                };
                let name = scalar_text(key).ok_or_else(|| {
                    AppError::Decode(format!(
                        "definition choice name must be a scalar, found {}",
                        long_tag(key)
                    ))
                })?;
                let parameters = match value {
                    Node::Null => DefinitionParameters::new(),
                    Node::Mapping(params) => mapping_to_facets(params)?,
                    other => {
                        return Err(AppError::Decode(format!(
                            "parameters of '{}' must be a mapping, found {}",
                            name,
                            long_tag(other)
                        )))
                    }
                };
                Ok(DefinitionChoice::Parameterized { name, parameters })
            }
            other => match scalar_text(other) {
                Some(name) => Ok(DefinitionChoice::Bare(name)),
                None => Err(AppError::Decode(format!(
                    "unmarshalable node kind {}",
                    long_tag(other)
                ))),
            },
        }
    }

    /// Returns the definition name.
    pub fn name(&self) -> &str {
        match self {
            DefinitionChoice::Bare(name) => name,
            DefinitionChoice::Parameterized { name, .. } => name,
        }
    }

    /// Returns the parameters, if any were given.
    pub fn parameters(&self) -> Option<&DefinitionParameters> {
        match self {
            DefinitionChoice::Bare(_) => None,
            DefinitionChoice::Parameterized { parameters, .. } => Some(parameters),
        }
    }
}

impl TryFrom<Node> for DefinitionChoice {
    type Error = AppError;

    fn try_from(node: Node) -> AppResult<Self> {
        Self::from_node(&node)
    }
}

/// Decodes an `is:` / `securedBy:` / `type:` value.
///
/// A sequence yields one choice per element; any other node is one choice.
pub fn parse_definition_choices(node: &Node) -> AppResult<Vec<DefinitionChoice>> {
    match node {
        Node::Sequence(items) => items.iter().map(DefinitionChoice::from_node).collect(),
        other => Ok(vec![DefinitionChoice::from_node(other)?]),
    }
}
