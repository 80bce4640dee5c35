#![deny(missing_docs)]

//! # RAML Types
//!
//! Type-expression resolution and synthesis for RAML API descriptions.

/// Shared error types.
pub mod error;

/// Generic document node helpers.
pub mod node;

/// Type model, classification and resolution.
pub mod types;

/// Registry owning every type of a document.
pub mod registry;

/// Definition choice (`is:` / `type:` / `securedBy:`) decoding.
pub mod definition;

/// Trait model and templating dictionary.
pub mod traits;

/// Document-level loading of types and traits.
pub mod document;

pub use definition::{parse_definition_choices, DefinitionChoice, DefinitionParameters};
pub use document::{parse_raml_types, RamlTypes};
pub use error::{AppError, AppResult};
pub use node::{Facets, Node};
pub use registry::TypeRegistry;
pub use traits::{init_trait_dicts, is_optional_trait_property, TemplateDicts, Trait};
pub use types::{
    classify, post_process, Properties, Property, PropertyValue, ScalarType, Synthesized, Type,
    TypeKind,
};
