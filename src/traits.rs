#![deny(missing_docs)]

//! # Traits
//!
//! A trait is a partial method definition (headers, query parameters, body,
//! responses) that methods inherit by listing it under `is:`. This module only
//! models traits; merging them into methods happens during templating.

use crate::error::{AppError, AppResult};
use crate::node::{deserialize_facets, deserialize_scalar_text, long_tag, Facets, Node};
use indexmap::IndexMap;
use serde::Deserialize;

/// Template substitution dictionary (parameter name to value).
pub type TemplateDicts = IndexMap<String, Node>;

/// Reserved template parameter holding the lowercased method name.
pub const METHOD_NAME_PARAM: &str = "methodName";

/// A reusable partial method definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Trait {
    /// Name under `traits:`.
    #[serde(skip)]
    pub name: String,
    /// How the trait should be used.
    #[serde(deserialize_with = "deserialize_scalar_text")]
    pub usage: Option<String>,
    /// What the method does to the resource.
    #[serde(deserialize_with = "deserialize_scalar_text")]
    pub description: Option<String>,
    /// Request bodies, by media type.
    pub body: Option<Node>,
    /// Request headers.
    #[serde(deserialize_with = "deserialize_facets")]
    pub headers: Facets,
    /// Responses, by status code.
    #[serde(deserialize_with = "deserialize_facets")]
    pub responses: Facets,
    /// Query parameters.
    #[serde(deserialize_with = "deserialize_facets")]
    pub query_parameters: Facets,
    /// Allowed protocols.
    pub protocols: Vec<String>,

    /// `body?`: applies only if the method already declares a body.
    #[serde(rename = "body?")]
    pub optional_body: Option<Node>,
    /// `headers?`: applies only if the method already declares headers.
    #[serde(rename = "headers?", deserialize_with = "deserialize_facets")]
    pub optional_headers: Facets,
    /// `responses?`: applies only if the method already declares responses.
    #[serde(rename = "responses?", deserialize_with = "deserialize_facets")]
    pub optional_responses: Facets,
    /// `queryParameters?`: applies only if the method already declares them.
    #[serde(rename = "queryParameters?", deserialize_with = "deserialize_facets")]
    pub optional_query_parameters: Facets,
}

impl Trait {
    /// Decodes a trait declaration. The name is assigned by [`Trait::post_process`].
    pub fn from_node(node: &Node) -> AppResult<Self> {
        match node {
            Node::Mapping(_) => serde_yaml::from_value(node.clone())
                .map_err(|e| AppError::Decode(format!("Failed to decode trait: {}", e))),
            Node::Null => Ok(Self::default()),
            other => Err(AppError::Decode(format!(
                "trait must be a mapping, found {}",
                long_tag(other)
            ))),
        }
    }

    /// Records the declared name.
    pub fn post_process(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Builds the dictionary used when applying a trait to a method.
///
/// Starts from the resource-type level dictionary and adds `methodName`.
pub fn init_trait_dicts(mut dicts: TemplateDicts, method_name: &str) -> TemplateDicts {
    dicts.insert(
        METHOD_NAME_PARAM.to_string(),
        Node::String(method_name.to_lowercase()),
    );
    dicts
}

/// True if a trait property only applies when already present (`body?`).
pub fn is_optional_trait_property(name: &str) -> bool {
    name.ends_with('?')
}
