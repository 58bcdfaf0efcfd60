use std::collections::HashMap;

use crate::drawing::PrimitiveId;
use crate::error::SceneError;

/// Root-level mapping between stable identifiers and the primitives they
/// were imported as. Built once from the importer's output; group
/// identifiers ride on [`crate::drawing::DrawingGroup::name`] instead.
#[derive(Debug, Default)]
pub struct IdentifierIndex {
    by_name: HashMap<String, PrimitiveId>,
    by_primitive: HashMap<PrimitiveId, String>,
}

impl IdentifierIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier. An identifier, once registered, is never
    /// reassigned; a second registration fails.
    pub fn insert(&mut self, name: &str, id: PrimitiveId) -> Result<(), SceneError> {
        if self.by_name.contains_key(name) {
            return Err(SceneError::DuplicateIdentifier(name.to_string()));
        }
        self.by_name.insert(name.to_string(), id);
        self.by_primitive.insert(id, name.to_string());
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<PrimitiveId> {
        self.by_name.get(name).copied()
    }

    /// Identifier of a primitive, resolved by identity rather than position.
    pub fn name_of(&self, id: &PrimitiveId) -> Option<&str> {
        self.by_primitive.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
