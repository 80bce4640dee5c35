#![deny(missing_docs)]

//! # Embedded Schema Normalization
//!
//! Rewrites an embedded JSON Schema into the shape the `utoipa` schema model
//! accepts before it is deserialized. Only known compatibility gaps are touched:
//!
//! - draft-03 boolean `required` on a property is lifted into the parent's
//!   `required` list
//! - `const` becomes a single-value `enum`
//! - boolean sub-schemas become object schemas
//! - untyped schemas get `object` / `array` when their keywords say so, and
//!   draft-03 `"type": "any"` is dropped
//! - `nullable` / `x-nullable` become `type` unions with `null`

use serde_json::{json, Map, Value};

/// Applies every normalization to a root schema.
pub(crate) fn normalize_embedded_schema(value: &mut Value) {
    lift_draft3_required(value);
    normalize_const_schemas(value);
    normalize_schema_node(value);
    normalize_untyped_schemas(value);
    normalize_nullable_schemas(value);
}

/// Lifts `properties.<name>.required: true` into the parent's `required` array.
pub(crate) fn lift_draft3_required(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut lifted = Vec::new();
            if let Some(props) = map.get_mut("properties").and_then(|p| p.as_object_mut()) {
                for (name, prop) in props.iter_mut() {
                    let Some(prop_map) = prop.as_object_mut() else {
                        continue;
                    };
                    if let Some(Value::Bool(flag)) = prop_map.get("required") {
                        if *flag {
                            lifted.push(name.clone());
                        }
                        prop_map.remove("required");
                    }
                }
            }
            if !lifted.is_empty() {
                let required = map
                    .entry("required")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(list) = required {
                    for name in lifted {
                        if !list.iter().any(|v| v.as_str() == Some(name.as_str())) {
                            list.push(Value::String(name));
                        }
                    }
                }
            }
            for v in map.values_mut() {
                lift_draft3_required(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                lift_draft3_required(v);
            }
        }
        _ => {}
    }
}

/// Normalizes `nullable` / `x-nullable` flags into JSON Schema null unions.
///
/// Untyped schemas and references already admit `null`, so the flag is dropped.
pub(crate) fn normalize_nullable_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            apply_nullable_flag(map);
            for v in map.values_mut() {
                normalize_nullable_schemas(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_nullable_schemas(v);
            }
        }
        _ => {}
    }
}

/// Normalizes `const` into a single-value `enum`, inferring `type` if absent.
pub(crate) fn normalize_const_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(const_val) = map.remove("const") {
                if !map.contains_key("enum") {
                    map.insert("enum".to_string(), Value::Array(vec![const_val.clone()]));
                }
                if !map.contains_key("type") {
                    if let Some(type_name) = infer_schema_type(&const_val) {
                        map.insert("type".to_string(), Value::String(type_name.to_string()));
                    }
                }
            }

            for (key, v) in map.iter_mut() {
                if matches!(key.as_str(), "example" | "examples" | "default" | "enum") {
                    continue;
                }
                normalize_const_schemas(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_const_schemas(v);
            }
        }
        _ => {}
    }
}

fn infer_schema_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(num) if num.is_i64() || num.is_u64() => Some("integer"),
        Value::Number(_) => Some("number"),
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
        Value::Null => None,
    }
}

fn normalize_schema_node(value: &mut Value) {
    match value {
        Value::Bool(flag) => {
            *value = bool_schema_replacement(*flag);
        }
        Value::Object(map) => for_each_subschema(map, normalize_schema_node),
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_schema_node(v);
            }
        }
        _ => {}
    }
}

/// Infers `type` where the keywords imply it and drops draft-03 `any`.
pub(crate) fn normalize_untyped_schemas(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    let drop_type = match map.get("type") {
        Some(Value::String(name)) => name == "any",
        Some(Value::Array(names)) => names.iter().any(|n| n.as_str() == Some("any")),
        _ => false,
    };
    if drop_type {
        map.remove("type");
    }

    if !map.contains_key("type") && !map.contains_key("$ref") {
        if map.contains_key("properties") {
            map.insert("type".to_string(), Value::String("object".to_string()));
        } else if map.contains_key("items") {
            map.insert("type".to_string(), Value::String("array".to_string()));
        }
    }

    for_each_subschema(map, normalize_untyped_schemas);
}

// Visits the schema-valued keywords of a schema object. Keyword maps such as
// `properties` are walked by value so property names are never treated as keywords.
fn for_each_subschema(map: &mut Map<String, Value>, visit: fn(&mut Value)) {
    for key in ["properties", "definitions", "$defs", "patternProperties"] {
        if let Some(children) = map.get_mut(key).and_then(|v| v.as_object_mut()) {
            for v in children.values_mut() {
                visit(v);
            }
        }
    }
    for key in ["allOf", "anyOf", "oneOf", "prefixItems"] {
        if let Some(children) = map.get_mut(key).and_then(|v| v.as_array_mut()) {
            for v in children.iter_mut() {
                visit(v);
            }
        }
    }
    for key in ["items", "not", "contains", "propertyNames"] {
        if let Some(child) = map.get_mut(key) {
            visit(child);
        }
    }
    if let Some(additional) = map.get_mut("additionalProperties") {
        if !additional.is_boolean() {
            visit(additional);
        }
    }
}

fn bool_schema_replacement(flag: bool) -> Value {
    if flag {
        Value::Object(Map::new())
    } else {
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["__never__"]
        })
    }
}

fn apply_nullable_flag(map: &mut Map<String, Value>) {
    let flagged = |key: &str| map.get(key).and_then(|v| v.as_bool()).unwrap_or(false);
    let nullable = flagged("nullable") || flagged("x-nullable");

    if !nullable {
        return;
    }

    map.remove("nullable");
    map.remove("x-nullable");

    if let Some(type_val) = map.get_mut("type") {
        match type_val {
            Value::String(s) => {
                if s.as_str() != "null" {
                    *type_val = json!([s.clone(), "null"]);
                }
            }
            Value::Array(arr) => {
                if !arr.iter().any(|v| v.as_str() == Some("null")) {
                    arr.push(Value::String("null".to_string()));
                }
            }
            _ => {}
        }
    }
}
