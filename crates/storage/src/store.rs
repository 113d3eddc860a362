//! Entity stores: one immutable collection per entity type

use crate::collection::EntityCollection;
use lensdb_core::EntityType;
use std::collections::BTreeMap;
use std::sync::Arc;

/// An immutable set of entity collections keyed by type
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    collections: BTreeMap<EntityType, Arc<EntityCollection>>,
}

impl EntityStore {
    pub(crate) fn from_collections(collections: BTreeMap<EntityType, Arc<EntityCollection>>) -> Self {
        EntityStore { collections }
    }

    /// The collection for an entity type, if the store has one
    pub fn collection(&self, entity_type: &EntityType) -> Option<&Arc<EntityCollection>> {
        self.collections.get(entity_type)
    }

    /// Entity types with a collection, in name order
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.collections.keys()
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Does the store have no collections?
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Total entities across all collections
    pub fn entity_count(&self) -> usize {
        self.collections.values().map(|c| c.len()).sum()
    }
}
