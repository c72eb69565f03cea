//! Entity type registry
//!
//! [`EntityModel`] is the built-in [`TypeRegistry`]: a table keyed by the
//! structured `(namespace, type name)` pair. It starts out holding the types
//! behind every [`EntityKind`]; further types can be registered, which makes
//! them usable in restrictions without giving them a result bucket.

use cipherdex_core::{EntityKind, RegistryError, TypeInfo, TypeRef, TypeRegistry};
use std::collections::BTreeMap;

/// Table-backed type registry
#[derive(Debug, Clone, Default)]
pub struct EntityModel {
    types: BTreeMap<TypeRef, TypeInfo>,
}

impl EntityModel {
    /// Registry containing no types
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry containing the type of every [`EntityKind`]
    pub fn builtin() -> Self {
        EntityKind::ALL
            .into_iter()
            .fold(Self::empty(), |model, kind| {
                model.with_type(kind.type_ref(), kind.type_info())
            })
    }

    /// Builder: register (or replace) a type
    pub fn with_type(mut self, type_ref: TypeRef, info: TypeInfo) -> Self {
        self.types.insert(type_ref, info);
        self
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for EntityModel {
    fn lookup(&self, type_ref: &TypeRef) -> Result<TypeInfo, RegistryError> {
        self.types
            .get(type_ref)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(type_ref.clone()))
    }
}
