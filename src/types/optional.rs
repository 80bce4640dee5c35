#![deny(missing_docs)]

//! # Optional Properties
//!
//! RAML allows `name?: type` as shorthand for `name: { type: type, required: false }`.
//! This pass rewrites the shorthand so later passes only see final property names.

use crate::error::{AppError, AppResult};
use crate::node::{long_tag, Node};
use crate::types::{Properties, PropertyValue};

/// True if `name` uses the `?` optional suffix.
pub fn is_optional_property(name: &str) -> bool {
    name.ends_with('?')
}

/// Rewrites every `name?` entry into `name` with `required: false`.
///
/// The rewritten entry keeps the position of the original one. A value that
/// is neither a type name nor an inline mapping is a configuration defect.
pub fn normalize_optional_properties(properties: &mut Properties) -> AppResult<()> {
    let optional: Vec<String> = properties
        .keys()
        .filter(|name| is_optional_property(name))
        .cloned()
        .collect();

    for name in optional {
        let Some((index, _, value)) = properties.shift_remove_full(&name) else {
            continue;
        };
        let base = name.trim_end_matches('?').to_string();

        let rewritten = match value {
            PropertyValue::TypeRef(type_name) => {
                let mut inline = PropertyValue::inline_type(type_name);
                if let PropertyValue::Inline(facets) = &mut inline {
                    facets.insert("required".to_string(), Node::Bool(false));
                }
                inline
            }
            PropertyValue::Inline(mut facets) => {
                facets.insert("required".to_string(), Node::Bool(false));
                PropertyValue::Inline(facets)
            }
            PropertyValue::Raw(node) => {
                return Err(AppError::Configuration(format!(
                    "unexpected value for optional property '{}': {}",
                    name,
                    long_tag(&node)
                )))
            }
        };

        if properties.contains_key(&base) {
            properties.insert(base, rewritten);
        } else {
            properties.shift_insert(index, base, rewritten);
        }
    }
    Ok(())
}
