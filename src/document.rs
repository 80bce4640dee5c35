#![deny(missing_docs)]

//! # RAML Document Loading
//!
//! Decodes the `types`, `schemas` and `traits` sections of a RAML document,
//! then resolves every declared type.

use crate::error::{AppError, AppResult};
use crate::node::{long_tag, scalar_text, Node};
use crate::registry::TypeRegistry;
use crate::traits::Trait;
use crate::types::Type;
use indexmap::IndexMap;
use tracing::debug;

/// The resolved type model and trait table of a document.
#[derive(Debug, Default, Clone)]
pub struct RamlTypes {
    /// Declared and synthesized types.
    pub types: TypeRegistry,
    /// Declared traits, by name.
    pub traits: IndexMap<String, Trait>,
}

/// Parses a RAML document and resolves its types.
///
/// `schemas` is the RAML 0.8 name for `types`; both accept a mapping or a
/// sequence of single-key mappings.
pub fn parse_raml_types(yaml_content: &str) -> AppResult<RamlTypes> {
    let root: Node = serde_yaml::from_str(yaml_content)?;
    let mut model = RamlTypes::default();

    for section in ["types", "schemas"] {
        for (name, node) in section_entries(&root, section)? {
            model.types.declare(Type::from_node(&name, node)?);
        }
    }

    for (name, node) in section_entries(&root, "traits")? {
        let mut t = Trait::from_node(node)?;
        t.post_process(&name);
        model.traits.insert(name, t);
    }

    debug!(
        types = model.types.len(),
        traits = model.traits.len(),
        "declarations loaded"
    );
    model.types.resolve_all()?;
    Ok(model)
}

fn section_entries<'a>(root: &'a Node, section: &str) -> AppResult<Vec<(String, &'a Node)>> {
    let mut entries = Vec::new();
    match root.get(section) {
        None | Some(Node::Null) => {}
        Some(Node::Mapping(mapping)) => {
            for (key, value) in mapping {
                entries.push((entry_name(section, key)?, value));
            }
        }
        Some(Node::Sequence(items)) => {
            for item in items {
                let Node::Mapping(mapping) = item else {
                    return Err(AppError::Decode(format!(
                        "'{}' entries must be mappings, found {}",
                        section,
                        long_tag(item)
                    )));
                };
                for (key, value) in mapping {
                    entries.push((entry_name(section, key)?, value));
                }
            }
        }
        Some(other) => {
            return Err(AppError::Decode(format!(
                "'{}' must be a mapping, found {}",
                section,
                long_tag(other)
            )))
        }
    }
    Ok(entries)
}

fn entry_name(section: &str, key: &Node) -> AppResult<String> {
    scalar_text(key).ok_or_else(|| {
        AppError::Decode(format!(
            "'{}' keys must be scalars, found {}",
            section,
            long_tag(key)
        ))
    })
}
