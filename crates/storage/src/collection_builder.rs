//! Builder for entity collections
//!
//! Accumulates entities of one type, enforcing the type's layout (if any),
//! then freezes them into an [`EntityCollection`]. Adding an entity whose id
//! is already present replaces the earlier one unless the caller asks to
//! keep existing entities.

use crate::collection::EntityCollection;
use lensdb_core::{AttributeSet, Entity, EntityType, Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Single-use builder for an [`EntityCollection`]
#[derive(Debug)]
pub struct EntityCollectionBuilder {
    entity_type: EntityType,
    layout: Option<AttributeSet>,
    entities: BTreeMap<i64, Entity>,
    indexes: Vec<String>,
}

impl EntityCollectionBuilder {
    /// Create a builder accepting any attributes
    pub fn new(entity_type: EntityType) -> Self {
        EntityCollectionBuilder {
            entity_type,
            layout: None,
            entities: BTreeMap::new(),
            indexes: Vec::new(),
        }
    }

    /// Create a builder whose entities must follow a layout
    ///
    /// Attributes named in the layout must carry the declared value type;
    /// other attributes are accepted as-is.
    pub fn with_layout(entity_type: EntityType, layout: AttributeSet) -> Self {
        EntityCollectionBuilder {
            layout: Some(layout),
            ..Self::new(entity_type)
        }
    }

    /// The type of entities this builder accepts
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// The layout, if one was set
    pub fn layout(&self) -> Option<&AttributeSet> {
        self.layout.as_ref()
    }

    /// Add an entity, replacing any entity with the same id
    pub fn add(&mut self, entity: Entity) -> Result<()> {
        self.add_with(entity, true).map(|_| ())
    }

    /// Add an entity
    ///
    /// When an entity with the same id exists, it is replaced if `replace` is
    /// true and kept otherwise. Returns whether the offered entity was stored.
    pub fn add_with(&mut self, entity: Entity, replace: bool) -> Result<bool> {
        self.check(&entity)?;
        if !replace && self.entities.contains_key(&entity.id()) {
            return Ok(false);
        }
        self.entities.insert(entity.id(), entity);
        Ok(true)
    }

    fn check(&self, entity: &Entity) -> Result<()> {
        if entity.entity_type() != &self.entity_type {
            return Err(Error::EntityTypeMismatch {
                expected: self.entity_type.clone(),
                actual: entity.entity_type().clone(),
            });
        }
        if let Some(layout) = &self.layout {
            for (name, value) in entity.attributes() {
                if let Some(declared) = layout.lookup(name) {
                    declared.check(value)?;
                }
            }
        }
        Ok(())
    }

    /// Request a secondary index on an attribute
    ///
    /// May be called before or after entities are added.
    pub fn add_index(&mut self, attribute: &str) -> &mut Self {
        if !self.indexes.iter().any(|a| a == attribute) {
            self.indexes.push(attribute.to_string());
        }
        self
    }

    /// Attributes with requested indices
    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }

    /// Has an entity with this id been added?
    pub fn contains(&self, id: i64) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of distinct entities added
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Has nothing been added yet?
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate the entities added so far, in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Freeze into an immutable collection
    ///
    /// With a layout the collection stores its entities in packed columns.
    pub fn build(self) -> EntityCollection {
        let EntityCollectionBuilder {
            entity_type,
            layout,
            entities,
            indexes,
        } = self;
        let entities: Vec<Entity> = entities.into_values().collect();
        let collection = EntityCollection::from_sorted(
            entity_type,
            entities,
            layout,
            indexes.iter().map(String::as_str),
        );
        debug!(
            target: "lensdb::store",
            entity_type = %collection.entity_type(),
            entities = collection.len(),
            packed = collection.is_packed(),
            packed_values = collection.packed_values(),
            indexes = ?indexes,
            "Built entity collection"
        );
        collection
    }
}
