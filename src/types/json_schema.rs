#![deny(missing_docs)]

//! # Embedded JSON Schema Absorption
//!
//! A type whose expression is a brace-delimited JSON Schema is turned into a
//! plain `object` type: the schema is parsed, normalized, and every schema
//! property is projected into a native inline property.

use crate::error::{AppError, AppResult};
use crate::node::{Facets, Node};
use crate::types::classifier::{ARRAY_TYPE, OBJECT_TYPE};
use crate::types::normalization::normalize_embedded_schema;
use crate::types::{Properties, PropertyValue, Type};
use serde_json::Value as JsonValue;
use tracing::{debug, trace};
use utoipa::openapi::schema::Schema;
use utoipa::openapi::RefOr;

/// Absorbs the embedded schema of `ty` into its properties.
///
/// Schema-derived properties overwrite existing ones of the same name and the
/// type expression becomes `object`.
pub fn absorb_json_schema(ty: &mut Type) -> AppResult<()> {
    let absorbed = parse_embedded_schema(&ty.type_string()).map_err(|e| match e {
        AppError::Decode(msg) => {
            AppError::Decode(format!("Invalid JSON Schema in type '{}': {}", ty.name, msg))
        }
        other => other,
    })?;

    debug!(name = %ty.name, properties = absorbed.len(), "absorbed embedded schema");
    ty.properties.extend(absorbed);
    ty.set_type_expr(Some(Node::String(OBJECT_TYPE.to_string())));
    Ok(())
}

/// Parses schema text and projects its properties.
///
/// Non-object schemas contribute no properties.
pub fn parse_embedded_schema(text: &str) -> AppResult<Properties> {
    let mut raw: JsonValue = serde_json::from_str(text.trim())
        .map_err(|e| AppError::Decode(format!("Failed to parse JSON: {}", e)))?;
    normalize_embedded_schema(&mut raw);

    let mut properties = Properties::new();
    collect_properties(&raw, &mut properties)?;
    Ok(properties)
}

fn collect_properties(schema: &JsonValue, out: &mut Properties) -> AppResult<()> {
    let Some(map) = schema.as_object() else {
        return Ok(());
    };

    match map.get("properties") {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Object(props)) => {
            let required: Vec<&str> = map
                .get("required")
                .and_then(JsonValue::as_array)
                .map(|list| list.iter().filter_map(JsonValue::as_str).collect())
                .unwrap_or_default();
            for (name, prop) in props {
                let flag = required.contains(&name.as_str());
                out.insert(name.clone(), project_property(name, prop, flag)?);
            }
        }
        Some(_) => {
            return Err(AppError::Decode(
                "Failed to parse JSON Schema: properties must be an object".to_string(),
            ))
        }
    }

    if let Some(JsonValue::Array(all_of)) = map.get("allOf") {
        for item in all_of {
            collect_properties(item, out)?;
        }
    }
    Ok(())
}

// Nodes the `utoipa` model rejects (untyped, draft-03 leftovers) are projected
// from the raw JSON instead.
fn project_property(name: &str, prop: &JsonValue, required: bool) -> AppResult<PropertyValue> {
    let mut facets = match serde_json::from_value::<RefOr<Schema>>(prop.clone()) {
        Ok(RefOr::Ref(r)) => {
            let mut facets = Facets::new();
            facets.insert("type".to_string(), Node::String(ref_name(&r.ref_location)));
            facets
        }
        Ok(RefOr::T(schema)) => {
            let value = serde_json::to_value(&schema)
                .map_err(|e| AppError::Decode(format!("Failed to project property: {}", e)))?;
            project_keywords(&value)?
        }
        Err(e) => {
            trace!(property = name, error = %e, "projecting schema property from raw JSON");
            match prop {
                JsonValue::Object(_) => project_keywords(prop)?,
                other => {
                    return Err(AppError::Decode(format!(
                        "Failed to parse JSON Schema: property '{}' must be a schema, found {}",
                        name, other
                    )))
                }
            }
        }
    };
    facets.insert("required".to_string(), Node::Bool(required));
    Ok(PropertyValue::Inline(facets))
}

fn project_keywords(value: &JsonValue) -> AppResult<Facets> {
    let mut facets = Facets::new();
    let Some(map) = value.as_object() else {
        return Ok(facets);
    };
    for (key, value) in map {
        let node = match key.as_str() {
            "type" => collapse_type(value)?,
            "items" => project_items(value)?,
            "$ref" => match value.as_str() {
                Some(reference) => {
                    facets.insert("type".to_string(), Node::String(ref_name(reference)));
                    continue;
                }
                None => json_to_node(value)?,
            },
            // JSON Schema lists required children; RAML flags the property itself.
            "required" => continue,
            _ => json_to_node(value)?,
        };
        facets.insert(key.clone(), node);
    }
    if !facets.contains_key("type") {
        if map.contains_key("properties") {
            facets.insert("type".to_string(), Node::String(OBJECT_TYPE.to_string()));
        } else if map.contains_key("items") {
            facets.insert("type".to_string(), Node::String(ARRAY_TYPE.to_string()));
        }
    }
    Ok(facets)
}

// `["integer", "null"]` -> `integer`
fn collapse_type(value: &JsonValue) -> AppResult<Node> {
    match value {
        JsonValue::Array(types) => {
            let first = types
                .iter()
                .filter_map(JsonValue::as_str)
                .find(|t| *t != "null")
                .unwrap_or("null");
            Ok(Node::String(first.to_string()))
        }
        other => json_to_node(other),
    }
}

fn project_items(value: &JsonValue) -> AppResult<Node> {
    match value.get("$ref").and_then(JsonValue::as_str) {
        Some(reference) => Ok(Node::String(ref_name(reference))),
        None => json_to_node(value),
    }
}

fn json_to_node(value: &JsonValue) -> AppResult<Node> {
    serde_yaml::to_value(value)
        .map_err(|e| AppError::Decode(format!("Failed to convert schema value: {}", e)))
}

/// Extracts the simple name from a reference string.
/// e.g. `#/definitions/Address` -> `Address`
fn ref_name(reference: &str) -> String {
    reference
        .trim_end_matches('#')
        .split('/')
        .next_back()
        .unwrap_or(reference)
        .to_string()
}
