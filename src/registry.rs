#![deny(missing_docs)]

//! # Type Registry
//!
//! Owns every declared and synthesized [`Type`] of a document. Resolution
//! borrows the registry mutably and passes it down explicitly; types never
//! hold a reference back to it.

use crate::error::AppResult;
use crate::node::Node;
use crate::types::{post_process, Properties, Type};
use indexmap::IndexMap;
use tracing::debug;

/// Name-indexed store of types, in declaration/creation order.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, Type>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a type, replacing any previous declaration of the same name.
    pub fn declare(&mut self, ty: Type) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Registers a synthetic type unless one of that name already exists.
    ///
    /// Returns true if a new type was created.
    pub fn create_type(
        &mut self,
        name: &str,
        type_expr: Option<Node>,
        properties: Properties,
    ) -> bool {
        if self.types.contains_key(name) {
            return false;
        }
        debug!(name, "registering synthetic type");
        self.types
            .insert(name.to_string(), Type::new(name, type_expr, properties));
        true
    }

    /// Returns the type registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Returns the type registered under `name` for in-place rewriting.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Type> {
        self.types.get_mut(name)
    }

    /// True if a type named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over registered types in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Resolves one registered type (see [`post_process`]).
    pub fn resolve(&mut self, name: &str) -> AppResult<()> {
        post_process(self, name)
    }

    /// Resolves every type present when called, in order.
    ///
    /// Synthetic types created along the way are resolved as they are
    /// created. The first error aborts the run.
    pub fn resolve_all(&mut self) -> AppResult<()> {
        let declared: Vec<String> = self.types.keys().cloned().collect();
        for name in &declared {
            post_process(self, name)?;
        }
        Ok(())
    }
}
