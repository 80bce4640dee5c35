#![deny(missing_docs)]

//! # Synthetic Types
//!
//! RAML lets a property declare its own nested object inline:
//!
//! ```yaml
//! Person:
//!   properties:
//!     address:
//!       properties:
//!         city: string
//! ```
//!
//! Resolution lifts such declarations into named types (`PersonAddress`,
//! or `<Owner><Property>Item` for array items), registers them, rewrites the
//! owning property to reference the new name and resolves the new type in turn.
//! Registration is idempotent, so resolving the same owner twice is a no-op.

use crate::error::{AppError, AppResult};
use crate::node::{facets_to_mapping, long_tag, mapping_to_facets, Node};
use crate::registry::TypeRegistry;
use crate::types::classifier::ARRAY_TYPE;
use crate::types::json_schema::absorb_json_schema;
use crate::types::optional::normalize_optional_properties;
use crate::types::{decode_properties, Properties, PropertyValue};
use tracing::{debug, trace};

/// The outcome of lifting one inline declaration into a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    /// Name of the synthesized type.
    pub name: String,
    /// False when a type of that name already existed.
    pub created: bool,
}

/// Resolves the registered type `name`.
///
/// Embedded JSON Schemas are absorbed into properties. Otherwise optional
/// properties are normalized and inline nested objects are lifted into
/// synthetic types, which are resolved depth-first as they are created.
pub fn post_process(registry: &mut TypeRegistry, name: &str) -> AppResult<()> {
    let ty = registry
        .lookup_mut(name)
        .ok_or_else(|| AppError::Configuration(format!("type {} not exist", name)))?;

    if ty.is_json_type() {
        return absorb_json_schema(ty);
    }

    // Detach the properties so nested resolution can borrow the registry.
    let mut properties = std::mem::take(&mut ty.properties);
    let result = resolve_properties(registry, name, &mut properties);
    if let Some(ty) = registry.lookup_mut(name) {
        ty.properties = properties;
    }
    result
}

fn resolve_properties(
    registry: &mut TypeRegistry,
    owner: &str,
    properties: &mut Properties,
) -> AppResult<()> {
    normalize_optional_properties(properties)?;

    let names: Vec<String> = properties.keys().cloned().collect();
    for property in &names {
        let nested = synthesize_nested_object(registry, owner, property, properties)?;
        let item = synthesize_array_item(registry, owner, property, properties)?;
        for synthesized in nested.into_iter().chain(item) {
            if synthesized.created {
                post_process(registry, &synthesized.name)?;
            }
        }
    }
    Ok(())
}

/// Lifts `owner.property = { properties: {...} }` into `<Owner><Property>`.
///
/// Returns `None` when the property declares no inline properties.
pub fn synthesize_nested_object(
    registry: &mut TypeRegistry,
    owner: &str,
    property: &str,
    properties: &mut Properties,
) -> AppResult<Option<Synthesized>> {
    let Some(PropertyValue::Inline(facets)) = properties.get_mut(property) else {
        return Ok(None);
    };
    let Some(nested) = facets.get("properties") else {
        return Ok(None);
    };
    let nested = inline_properties(owner, property, nested)?;

    let name = synthetic_name(owner, property, "");
    let created = registry.create_type(&name, facets.get("type").cloned(), nested);

    facets.shift_remove("properties");
    facets.insert("type".to_string(), Node::String(name.clone()));

    debug!(owner, property, synthesized = %name, created, "lifted inline object");
    Ok(Some(Synthesized { name, created }))
}

/// Lifts `owner.property = { type: array, items: { properties: {...} } }`
/// into `<Owner><Property>Item`.
///
/// Returns `None` unless the property is an `array` whose inline `items`
/// declares properties.
pub fn synthesize_array_item(
    registry: &mut TypeRegistry,
    owner: &str,
    property: &str,
    properties: &mut Properties,
) -> AppResult<Option<Synthesized>> {
    let Some(PropertyValue::Inline(facets)) = properties.get_mut(property) else {
        return Ok(None);
    };
    if facets.get("type").and_then(Node::as_str) != Some(ARRAY_TYPE) {
        return Ok(None);
    }
    let Some(Node::Mapping(items)) = facets.get("items") else {
        trace!(owner, property, "array property without inline items");
        return Ok(None);
    };
    let mut items = mapping_to_facets(items)?;
    let Some(nested) = items.get("properties") else {
        return Ok(None);
    };
    let nested = inline_properties(owner, property, nested)?;

    let name = synthetic_name(owner, property, "Item");
    let created = registry.create_type(&name, items.get("type").cloned(), nested);

    items.shift_remove("properties");
    items.insert("type".to_string(), Node::String(name.clone()));
    facets.insert("items".to_string(), Node::Mapping(facets_to_mapping(&items)));

    debug!(owner, property, synthesized = %name, created, "lifted inline array item");
    Ok(Some(Synthesized { name, created }))
}

/// Joins owner and property into a type name: `Person` + `address` -> `PersonAddress`.
pub fn synthetic_name(owner: &str, property: &str, suffix: &str) -> String {
    let mut chars = property.chars();
    let head: String = chars.next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
    format!("{}{}{}{}", owner, head, chars.as_str(), suffix)
}

fn inline_properties(owner: &str, property: &str, nested: &Node) -> AppResult<Properties> {
    match nested {
        Node::Mapping(mapping) => decode_properties(mapping),
        other => Err(AppError::Decode(format!(
            "inline properties of {}.{} must be a mapping, found {}",
            owner,
            property,
            long_tag(other)
        ))),
    }
}
