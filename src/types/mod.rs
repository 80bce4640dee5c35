#![deny(missing_docs)]

//! # RAML Types
//!
//! The in-memory type model and the resolution pipeline that runs over it.
//!
//! - **classifier**: Priority-ordered classification of type expressions.
//! - **optional**: Rewriting of `name?` shorthand properties.
//! - **synthesis**: Synthetic types for inline nested objects and array items.
//! - **json_schema**: Absorption of embedded JSON Schemas into properties.
//! - **normalization**: Pre-parse rewrites of embedded JSON Schema documents.

pub mod classifier;
pub mod json_schema;
pub mod normalization;
pub mod optional;
pub mod synthesis;

pub use classifier::{classify, ScalarType, TypeKind};
pub use synthesis::{post_process, Synthesized};

use crate::error::{AppError, AppResult};
use crate::node::{
    deserialize_scalar_text, long_tag, mapping_to_facets, scalar_text, Facets, Node,
};
use classifier::OBJECT_TYPE;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::OnceCell;

/// Property name to property value, in declaration order.
pub type Properties = IndexMap<String, PropertyValue>;

/// The value of one entry under a type's `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub enum PropertyValue {
    /// `name: Person` shorthand.
    TypeRef(String),
    /// `name: { type: integer, minimum: 0 }`.
    Inline(Facets),
    /// Any other node, kept untouched.
    Raw(Node),
}

impl PropertyValue {
    /// Builds an inline facet mapping holding only a `type` facet.
    pub fn inline_type(type_name: impl Into<String>) -> Self {
        let mut facets = Facets::new();
        facets.insert("type".to_string(), Node::String(type_name.into()));
        PropertyValue::Inline(facets)
    }

    /// Returns the inline facets, if this is an inline mapping.
    pub fn as_inline(&self) -> Option<&Facets> {
        match self {
            PropertyValue::Inline(facets) => Some(facets),
            _ => None,
        }
    }
}

impl TryFrom<Node> for PropertyValue {
    type Error = AppError;

    fn try_from(node: Node) -> AppResult<Self> {
        match node {
            Node::String(name) => Ok(PropertyValue::TypeRef(name)),
            Node::Mapping(mapping) => Ok(PropertyValue::Inline(mapping_to_facets(&mapping)?)),
            other => Ok(PropertyValue::Raw(other)),
        }
    }
}

impl From<PropertyValue> for Node {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::TypeRef(name) => Node::String(name),
            PropertyValue::Inline(facets) => Node::Mapping(crate::node::facets_to_mapping(&facets)),
            PropertyValue::Raw(node) => node,
        }
    }
}

/// Decodes a `properties` mapping into [`Properties`].
pub fn decode_properties(mapping: &serde_yaml::Mapping) -> AppResult<Properties> {
    let mut properties = Properties::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = scalar_text(key).ok_or_else(|| {
            AppError::Decode(format!(
                "property name must be a scalar, found {}",
                long_tag(key)
            ))
        })?;
        properties.insert(name, PropertyValue::try_from(value.clone())?);
    }
    Ok(properties)
}

fn deserialize_properties<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    match Node::deserialize(deserializer)? {
        Node::Null => Ok(Properties::new()),
        Node::Mapping(mapping) => decode_properties(&mapping).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "properties must be a mapping, found {}",
            long_tag(&other)
        ))),
    }
}

/// Renders a raw type expression node as text.
///
/// Strings are returned as-is, a sequence of names becomes `[A,B]` and other
/// scalars use their literal text. Mappings and null render as empty.
pub fn render_type_expr(node: &Node) -> String {
    match node {
        Node::String(s) => s.clone(),
        Node::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(render_type_expr).collect();
            format!("[{}]", parts.join(","))
        }
        Node::Tagged(tagged) => render_type_expr(&tagged.value),
        other => scalar_text(other).unwrap_or_default(),
    }
}

/// A single RAML data type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Type {
    /// The declared (or synthesized) name.
    #[serde(skip)]
    pub name: String,

    /// Value used when an instance is missing entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Node>,

    /// RAML 0.8 alias for `type`; only consulted when `type` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Node>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_expr: Option<Node>,

    /// An example instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Node>,

    /// Named example instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Facets>,

    /// Human-friendly name.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_scalar_text"
    )]
    pub display_name: Option<String>,

    /// Markdown description.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_scalar_text"
    )]
    pub description: Option<String>,

    /// User-defined facets inherited by subtypes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,

    /// XML serialization configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Node>,

    /// Declared properties. Rewritten in place during resolution.
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "deserialize_properties"
    )]
    pub properties: Properties,

    /// Minimum number of properties on an instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,

    /// Maximum number of properties on an instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    /// Whether undeclared properties are allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Node>,

    /// Property naming the concrete subtype of an instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    /// Value of the discriminator identifying this type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<Node>,

    /// Element type of an `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Node>,

    /// Minimum array length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Maximum array length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Whether array items must be unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Node>,

    /// Regular expression a string must match.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_scalar_text"
    )]
    pub pattern: Option<String>,

    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Number format (`int32`, `double`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Numeric instances must be a multiple of this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    /// Accepted content types for `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_types: Option<Vec<String>>,

    /// Annotations (`(name)` keys) and facets not modelled above.
    #[serde(flatten)]
    pub annotations: Facets,

    #[serde(skip)]
    kind: OnceCell<TypeKind>,
}

impl Type {
    /// Creates a type with an expression and properties.
    pub fn new(name: impl Into<String>, type_expr: Option<Node>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            type_expr,
            properties,
            ..Self::default()
        }
    }

    /// Decodes a declaration under `types:` / `schemas:`.
    ///
    /// A bare string or sequence is shorthand for `{ type: <value> }`.
    pub fn from_node(name: &str, node: &Node) -> AppResult<Self> {
        let mut ty = match node {
            Node::String(_) | Node::Sequence(_) => {
                Type::new(name, Some(node.clone()), Properties::new())
            }
            Node::Mapping(_) => serde_yaml::from_value::<Type>(node.clone()).map_err(|e| {
                AppError::Decode(format!("Failed to decode type '{}': {}", name, e))
            })?,
            Node::Null => Type::default(),
            other => {
                return Err(AppError::Decode(format!(
                    "type '{}' cannot be declared as {}",
                    name,
                    long_tag(other)
                )))
            }
        };
        ty.name = name.to_string();
        if ty.type_expr.is_none() {
            ty.type_expr = ty.schema.clone();
        }
        Ok(ty)
    }

    /// Returns the raw type expression.
    pub fn type_expr(&self) -> Option<&Node> {
        self.type_expr.as_ref()
    }

    /// Replaces the type expression, dropping the memoized classification.
    pub fn set_type_expr(&mut self, type_expr: Option<Node>) {
        self.type_expr = type_expr;
        self.kind = OnceCell::new();
    }

    /// Returns the type expression rendered as text.
    pub fn type_string(&self) -> String {
        self.type_expr
            .as_ref()
            .map(render_type_expr)
            .unwrap_or_default()
    }

    /// Returns the memoized classification of the type expression.
    pub fn kind(&self) -> &TypeKind {
        self.kind.get_or_init(|| classify(&self.type_string()))
    }

    /// True if the expression names a built-in type (`object` included).
    pub fn is_builtin(&self) -> bool {
        classifier::is_builtin(&self.type_string())
    }

    /// True if the expression is an embedded JSON Schema.
    pub fn is_json_type(&self) -> bool {
        matches!(self.kind(), TypeKind::EmbeddedSchema)
    }

    /// Returns parents of this type. `object` is not considered a parent.
    pub fn parents(&self) -> Vec<String> {
        self.kind().parents()
    }

    /// Returns the single parent, if this type inherits from exactly one.
    pub fn single_inheritance(&self) -> Option<&str> {
        match self.kind() {
            TypeKind::SingleInheritance(parent) => Some(parent),
            _ => None,
        }
    }

    /// Returns all parents, if this type inherits from two or more.
    pub fn multiple_inheritance(&self) -> Option<&[String]> {
        match self.kind() {
            TypeKind::MultipleInheritance(parents) => Some(parents),
            _ => None,
        }
    }

    /// True if this type has multiple inheritance.
    pub fn is_multiple_inheritance(&self) -> bool {
        self.multiple_inheritance().is_some()
    }

    /// True if this type is an array (`array` or `T[]`).
    pub fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    /// Returns the element type of an array.
    ///
    /// For the `array` keyword the element type comes from `items`.
    pub fn array_type(&self) -> Option<String> {
        match self.kind() {
            TypeKind::Array(Some(element)) => Some(element.clone()),
            TypeKind::Array(None) => self.items.as_ref().map(render_items),
            _ => None,
        }
    }

    /// True if this type is a bidimensional array (`T[][]`).
    pub fn is_bidimensional_array(&self) -> bool {
        matches!(self.kind(), TypeKind::BidimensionalArray(_))
    }

    /// Returns the element type of a bidimensional array.
    pub fn bidimensional_array_type(&self) -> Option<&str> {
        match self.kind() {
            TypeKind::BidimensionalArray(element) => Some(element),
            _ => None,
        }
    }

    /// True if this type is a union.
    pub fn is_union(&self) -> bool {
        matches!(self.kind(), TypeKind::Union(_))
    }

    /// Returns the union members.
    pub fn union(&self) -> Option<&[String]> {
        match self.kind() {
            TypeKind::Union(members) => Some(members),
            _ => None,
        }
    }

    /// True if an `enum` facet is present.
    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    /// True if this type only renames another type.
    pub fn is_alias(&self) -> bool {
        let wraps_named = matches!(
            self.kind(),
            TypeKind::SingleInheritance(_) | TypeKind::Builtin(_)
        );
        wraps_named && self.properties.is_empty()
    }

    /// Returns the property with the given name.
    ///
    /// An unknown name is a configuration defect.
    pub fn property(&self, name: &str) -> AppResult<Property> {
        let value = self.properties.get(name).ok_or_else(|| {
            AppError::Configuration(format!(
                "property {} not exist in type {}",
                name, self.name
            ))
        })?;
        Ok(Property::from_value(name, value))
    }
}

// `items` may be a bare name or an inline declaration with a `type`.
fn render_items(items: &Node) -> String {
    match items.get("type") {
        Some(inner) if items.is_mapping() => render_type_expr(inner),
        _ => render_type_expr(items),
    }
}

/// A resolved view of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name, without any `?` suffix.
    pub name: String,
    /// The property's type expression.
    pub type_expr: String,
    /// Whether instances must carry this property.
    pub required: bool,
    /// Remaining facets of an inline declaration.
    pub facets: Facets,
}

impl Property {
    /// Builds a property view from its raw value.
    pub fn from_value(name: &str, value: &PropertyValue) -> Self {
        let (base, optional) = match name.strip_suffix('?') {
            Some(base) => (base, true),
            None => (name, false),
        };
        let (type_expr, required, facets) = match value {
            PropertyValue::TypeRef(type_name) => (type_name.clone(), true, Facets::new()),
            PropertyValue::Inline(facets) => {
                let mut facets = facets.clone();
                let type_expr = match facets.shift_remove("type") {
                    Some(node) => render_type_expr(&node),
                    None if facets.contains_key("properties") => OBJECT_TYPE.to_string(),
                    None => ScalarType::String.as_str().to_string(),
                };
                let required = facets
                    .shift_remove("required")
                    .and_then(|node| node.as_bool())
                    .unwrap_or(true);
                (type_expr, required, facets)
            }
            PropertyValue::Raw(Node::Null) => {
                (ScalarType::String.as_str().to_string(), true, Facets::new())
            }
            PropertyValue::Raw(node) => (render_type_expr(node), true, Facets::new()),
        };
        Self {
            name: base.to_string(),
            type_expr,
            required: required && !optional,
            facets,
        }
    }

    /// Returns the classification of the property's type expression.
    pub fn kind(&self) -> TypeKind {
        classify(&self.type_expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(yaml: &str) -> Type {
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        Type::from_node("Sample", &node).unwrap()
    }

    #[test]
    fn test_decode_full_declaration() {
        let ty = decl(
            r#"
type: object
displayName: Person
description: A human
discriminator: kind
minProperties: 1
(audit): true
properties:
  name: string
  age:
    type: integer
    minimum: 0
"#,
        );
        assert_eq!(ty.name, "Sample");
        assert_eq!(ty.type_string(), "object");
        assert_eq!(ty.display_name.as_deref(), Some("Person"));
        assert_eq!(ty.discriminator.as_deref(), Some("kind"));
        assert_eq!(ty.min_properties, Some(1));
        assert!(ty.annotations.contains_key("(audit)"));
        assert_eq!(
            ty.properties.get("name"),
            Some(&PropertyValue::TypeRef("string".into()))
        );
        assert!(matches!(
            ty.properties.get("age"),
            Some(PropertyValue::Inline(_))
        ));
        assert_eq!(ty.kind(), &TypeKind::Object);
    }

    #[test]
    fn test_sequence_expression_renders_as_bracket_list() {
        let ty = decl("type: [A, B, C]");
        assert_eq!(ty.type_string(), "[A,B,C]");
        assert_eq!(ty.parents(), vec!["A", "B", "C"]);
        assert!(ty.is_multiple_inheritance());
    }

    #[test]
    fn test_shorthand_declaration() {
        let ty = decl("Person[]");
        assert!(ty.is_array());
        assert_eq!(ty.array_type().as_deref(), Some("Person"));

        let grid = decl("Person[][]");
        assert!(grid.is_bidimensional_array());
        assert!(!grid.is_array());
        assert_eq!(grid.bidimensional_array_type(), Some("Person"));
    }

    #[test]
    fn test_array_keyword_uses_items() {
        let ty = decl("type: array\nitems: Person");
        assert_eq!(ty.array_type().as_deref(), Some("Person"));

        let inline = decl("type: array\nitems:\n  type: Person\n  minItems: 1");
        assert_eq!(inline.array_type().as_deref(), Some("Person"));
    }

    #[test]
    fn test_union_members() {
        let ty = decl("type: A|B|C");
        assert_eq!(
            ty.union(),
            Some(&["A".to_string(), "B".to_string(), "C".to_string()][..])
        );
    }

    #[test]
    fn test_alias_requires_no_properties() {
        let mut ty = Type::new("Employee", Some(Node::from("Base")), Properties::new());
        assert!(ty.is_alias());
        ty.properties
            .insert("id".into(), PropertyValue::TypeRef("string".into()));
        assert!(!ty.is_alias());

        assert!(!decl("object").is_alias());
        assert!(!decl("Person[]").is_alias());
        assert!(!decl("A | B").is_alias());
        assert!(!decl("[A, B]").is_alias());
        assert!(!Type::default().is_alias());
    }

    #[test]
    fn test_schema_is_alias_of_type() {
        let ty = decl("schema: Person");
        assert_eq!(ty.single_inheritance(), Some("Person"));
    }

    #[test]
    fn test_set_type_expr_resets_classification() {
        let mut ty = decl("Person");
        assert_eq!(ty.kind(), &TypeKind::SingleInheritance("Person".into()));
        ty.set_type_expr(Some(Node::from("object")));
        assert_eq!(ty.kind(), &TypeKind::Object);
    }

    #[test]
    fn test_enum_facet() {
        assert!(decl("type: string\nenum: [a, b]").is_enum());
        assert!(!decl("string").is_enum());
    }

    #[test]
    fn test_property_view() {
        let ty = decl(
            r#"
properties:
  name: string
  age:
    type: integer
    required: false
    minimum: 0
  address:
    properties:
      city: string
  nickname?:
  tags: [a, b]
"#,
        );
        let name = ty.property("name").unwrap();
        assert_eq!(name.type_expr, "string");
        assert!(name.required);

        let age = ty.property("age").unwrap();
        assert_eq!(age.type_expr, "integer");
        assert!(!age.required);
        assert_eq!(age.facets.get("minimum"), Some(&Node::from(0)));

        assert_eq!(ty.property("address").unwrap().type_expr, "object");

        let nickname = ty.property("nickname?").unwrap();
        assert_eq!(nickname.name, "nickname");
        assert_eq!(nickname.type_expr, "string");
        assert!(!nickname.required);

        assert_eq!(ty.property("tags").unwrap().kind(), classify("[a,b]"));
    }

    #[test]
    fn test_unknown_property_is_configuration_defect() {
        let ty = decl("properties:\n  name: string");
        let err = ty.property("missing").unwrap_err();
        assert!(err.is_configuration_defect());
    }

    #[test]
    fn test_numeric_property_names_decode_like_synthesized_ones() {
        let ty = decl("properties:\n  200: string\n  true: integer\n  name: string");
        assert_eq!(
            ty.properties.keys().collect::<Vec<_>>(),
            vec!["200", "true", "name"]
        );
        assert_eq!(ty.property("200").unwrap().type_expr, "string");

        let node: Node = serde_yaml::from_str("properties:\n  ? [a, b]\n  : string").unwrap();
        assert!(matches!(
            Type::from_node("Bad", &node),
            Err(AppError::Decode(_))
        ));
    }

    #[test]
    fn test_scalar_text_facets_accept_numbers() {
        let ty = decl("type: string\ndisplayName: 5\ndescription: true\npattern: 123");
        assert_eq!(ty.display_name.as_deref(), Some("5"));
        assert_eq!(ty.description.as_deref(), Some("true"));
        assert_eq!(ty.pattern.as_deref(), Some("123"));

        let node: Node = serde_yaml::from_str("displayName: [a]").unwrap();
        assert!(Type::from_node("Bad", &node).is_err());
    }

    #[test]
    fn test_invalid_declaration_node() {
        let node = Node::from(true);
        assert!(matches!(
            Type::from_node("Flag", &node),
            Err(AppError::Decode(_))
        ));
    }
}
