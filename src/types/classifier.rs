#![deny(missing_docs)]

//! # Type Expression Classification
//!
//! Maps a raw RAML type expression (`Person[]`, `[A, B]`, `A | B`, `{...}`)
//! onto exactly one [`TypeKind`]. Checks run in a fixed priority order and
//! the first match wins.

use std::fmt;

/// The keyword naming the generic array type.
pub const ARRAY_TYPE: &str = "array";

/// The keyword naming the generic object type.
pub const OBJECT_TYPE: &str = "object";

/// The built-in RAML scalar types, including the number formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `date-only`
    DateOnly,
    /// `time-only`
    TimeOnly,
    /// `datetime-only`
    DatetimeOnly,
    /// `datetime`
    Datetime,
    /// `file`
    File,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl ScalarType {
    /// Looks up a scalar type by its RAML name.
    pub fn from_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "date-only" => Self::DateOnly,
            "time-only" => Self::TimeOnly,
            "datetime-only" => Self::DatetimeOnly,
            "datetime" => Self::Datetime,
            "file" => Self::File,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        };
        Some(scalar)
    }

    /// Returns the RAML name of this scalar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::DateOnly => "date-only",
            Self::TimeOnly => "time-only",
            Self::DatetimeOnly => "datetime-only",
            Self::Datetime => "datetime",
            Self::File => "file",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic kind of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// No expression was given.
    Unspecified,
    /// A brace-delimited JSON Schema embedded in the expression.
    EmbeddedSchema,
    /// The literal `object`.
    Object,
    /// One of the built-in scalar types.
    Builtin(ScalarType),
    /// `[A, B, ...]` with two or more parents.
    MultipleInheritance(Vec<String>),
    /// `Element[][]`, holding the element type.
    BidimensionalArray(String),
    /// `Element[]` holds `Some(element)`; the `array` keyword holds `None`
    /// and takes its element type from the `items` facet.
    Array(Option<String>),
    /// `A | B | ...`, holding the trimmed members.
    Union(Vec<String>),
    /// Any other bare name.
    SingleInheritance(String),
}

impl TypeKind {
    /// Returns the parent types named by this kind.
    ///
    /// `object`, scalars, arrays and unions have no parents.
    pub fn parents(&self) -> Vec<String> {
        match self {
            TypeKind::MultipleInheritance(parents) => parents.clone(),
            TypeKind::SingleInheritance(parent) => vec![parent.clone()],
            _ => Vec::new(),
        }
    }

    /// True for both array forms (bidimensional arrays excluded).
    pub fn is_array(&self) -> bool {
        matches!(self, TypeKind::Array(_))
    }
}

/// Classifies a raw type expression.
///
/// # Arguments
///
/// * `expr` - The type expression exactly as written in the document.
pub fn classify(expr: &str) -> TypeKind {
    if expr.trim().is_empty() {
        return TypeKind::Unspecified;
    }
    if is_embedded_schema(expr) {
        return TypeKind::EmbeddedSchema;
    }
    if expr == OBJECT_TYPE {
        return TypeKind::Object;
    }
    if let Some(scalar) = ScalarType::from_name(expr) {
        return TypeKind::Builtin(scalar);
    }
    if let Some(mut parents) = bracketed_names(expr) {
        match parents.len() {
            0 => return TypeKind::Unspecified,
            1 => return TypeKind::SingleInheritance(parents.remove(0)),
            _ => return TypeKind::MultipleInheritance(parents),
        }
    }
    if let Some(element) = expr.strip_suffix("[][]") {
        if element.is_empty() {
            return TypeKind::Unspecified;
        }
        return TypeKind::BidimensionalArray(element.to_string());
    }
    if expr == ARRAY_TYPE {
        return TypeKind::Array(None);
    }
    if let Some(element) = expr.strip_suffix("[]") {
        if element.is_empty() {
            return TypeKind::Unspecified;
        }
        return TypeKind::Array(Some(element.to_string()));
    }
    if expr.find('|').is_some_and(|idx| idx > 0) {
        let members = expr.split('|').map(|m| m.trim().to_string()).collect();
        return TypeKind::Union(members);
    }
    TypeKind::SingleInheritance(expr.to_string())
}

/// True when the trimmed expression is a brace-delimited JSON Schema.
pub fn is_embedded_schema(expr: &str) -> bool {
    let trimmed = expr.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

/// True when `expr` names a RAML built-in type, `object` included.
pub fn is_builtin(expr: &str) -> bool {
    expr == OBJECT_TYPE || ScalarType::from_name(expr).is_some()
}

// `[A, B]` -> names, with empty segments dropped.
fn bracketed_names(expr: &str) -> Option<Vec<String>> {
    let inner = expr.strip_prefix('[')?.strip_suffix(']')?;
    if inner.contains(['[', ']']) {
        return None;
    }
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(classify(" {\"type\": \"object\"} "), TypeKind::EmbeddedSchema);
        assert_eq!(classify("object"), TypeKind::Object);
        assert_eq!(classify("string"), TypeKind::Builtin(ScalarType::String));
        assert_eq!(
            classify("datetime-only"),
            TypeKind::Builtin(ScalarType::DatetimeOnly)
        );
        assert_eq!(
            classify("[A, B]"),
            TypeKind::MultipleInheritance(vec!["A".into(), "B".into()])
        );
        assert_eq!(
            classify("Person[][]"),
            TypeKind::BidimensionalArray("Person".into())
        );
        assert_eq!(classify("Person[]"), TypeKind::Array(Some("Person".into())));
        assert_eq!(classify("array"), TypeKind::Array(None));
        assert_eq!(
            classify("A | B"),
            TypeKind::Union(vec!["A".into(), "B".into()])
        );
        assert_eq!(classify("Person"), TypeKind::SingleInheritance("Person".into()));
        assert_eq!(classify(""), TypeKind::Unspecified);
    }

    #[test]
    fn test_parents() {
        assert_eq!(classify("[A, B, C]").parents(), vec!["A", "B", "C"]);
        assert_eq!(classify("Person").parents(), vec!["Person"]);
        assert!(classify("object").parents().is_empty());
        assert!(classify("integer").parents().is_empty());
        assert!(classify("Person[]").parents().is_empty());
    }

    #[test]
    fn test_single_bracketed_name_is_single_inheritance() {
        assert_eq!(classify("[Base]"), TypeKind::SingleInheritance("Base".into()));
    }

    #[test]
    fn test_empty_brackets_are_unspecified() {
        assert_eq!(classify("[]"), TypeKind::Unspecified);
        assert_eq!(classify("[ , ]"), TypeKind::Unspecified);
        assert_eq!(classify("[][]"), TypeKind::Unspecified);
        assert!(classify("[]").parents().is_empty());
    }

    #[test]
    fn test_union_trims_members_and_ignores_leading_pipe() {
        assert_eq!(
            classify("A|B|C"),
            TypeKind::Union(vec!["A".into(), "B".into(), "C".into()])
        );
        assert_eq!(
            classify(" Cat |  Dog "),
            TypeKind::Union(vec!["Cat".into(), "Dog".into()])
        );
        assert_eq!(classify("|A"), TypeKind::SingleInheritance("|A".into()));
    }

    #[test]
    fn test_array_of_union_is_array() {
        assert_eq!(
            classify("(A | B)[]"),
            TypeKind::Array(Some("(A | B)".into()))
        );
    }

    #[test]
    fn test_builtin_includes_object() {
        assert!(is_builtin("object"));
        assert!(is_builtin("int64"));
        assert!(!is_builtin("Person"));
        assert_eq!(ScalarType::from_name("object"), None);
    }
}
