//! Builder for entity stores
//!
//! Routes entities to per-type collection builders, applies layouts,
//! indices and derivations, and freezes everything into an [`EntityStore`].
//!
//! The builder is single use: after a successful `build()` every method
//! returns [`Error::BuilderConsumed`].

use crate::collection_builder::EntityCollectionBuilder;
use crate::store::EntityStore;
use lensdb_core::{AttributeSet, Entity, EntityDefaults, EntityType, Error, Result, TypedName};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct BuilderState {
    builders: FxHashMap<EntityType, EntityCollectionBuilder>,
    /// Most recently used builder, kept out of `builders`
    last: Option<EntityCollectionBuilder>,
    default_indexes: Vec<String>,
}

impl BuilderState {
    fn existing(&self, entity_type: &EntityType) -> Option<&EntityCollectionBuilder> {
        match &self.last {
            Some(b) if b.entity_type() == entity_type => Some(b),
            _ => self.builders.get(entity_type),
        }
    }

    fn new_builder(&self, entity_type: &EntityType, layout: Option<AttributeSet>) -> EntityCollectionBuilder {
        let mut builder = match layout {
            Some(layout) => EntityCollectionBuilder::with_layout(entity_type.clone(), layout),
            None => EntityCollectionBuilder::new(entity_type.clone()),
        };
        for name in &self.default_indexes {
            builder.add_index(name);
        }
        builder
    }

    /// The builder for a type, created on demand and moved into the `last` slot
    fn builder_for(&mut self, entity_type: &EntityType) -> &mut EntityCollectionBuilder {
        let cached = matches!(&self.last, Some(b) if b.entity_type() == entity_type);
        if !cached {
            let next = match self.builders.remove(entity_type) {
                Some(b) => b,
                None => self.new_builder(entity_type, None),
            };
            if let Some(prev) = self.last.replace(next) {
                self.builders.insert(prev.entity_type().clone(), prev);
            }
        }
        self.last
            .get_or_insert_with(|| EntityCollectionBuilder::new(entity_type.clone()))
    }

    fn all_builders(&self) -> impl Iterator<Item = &EntityCollectionBuilder> {
        self.builders.values().chain(self.last.iter())
    }
}

/// Single-use builder for an [`EntityStore`]
///
/// ```ignore
/// let mut builder = EntityStoreBuilder::new();
/// builder.add_default_index("user")?;
/// builder.add_entities(ratings.iter().map(Rating::to_entity))?;
/// builder.apply_default_derivations()?;
/// let store = builder.build()?;
/// ```
#[derive(Debug)]
pub struct EntityStoreBuilder {
    state: Option<BuilderState>,
}

impl Default for EntityStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStoreBuilder {
    /// Create an empty store builder
    pub fn new() -> Self {
        EntityStoreBuilder {
            state: Some(BuilderState::default()),
        }
    }

    fn state(&mut self) -> Result<&mut BuilderState> {
        self.state.as_mut().ok_or(Error::BuilderConsumed)
    }

    /// Has `build()` already been called?
    pub fn is_consumed(&self) -> bool {
        self.state.is_none()
    }

    /// Declare the layout of an entity type
    ///
    /// Fails if the type already has a layout or already has entities.
    pub fn set_layout(&mut self, entity_type: &EntityType, layout: AttributeSet) -> Result<&mut Self> {
        let state = self.state()?;
        let conflict = state.existing(entity_type).and_then(|b| {
            if b.layout().is_some() {
                Some("layout already set")
            } else if !b.is_empty() {
                Some("entities already added")
            } else {
                None
            }
        });
        if let Some(reason) = conflict {
            return Err(Error::LayoutConflict {
                entity_type: entity_type.clone(),
                reason,
            });
        }
        let mut builder = state.new_builder(entity_type, Some(layout));
        if let Some(existing) = state.builders.remove(entity_type) {
            for name in existing.indexes() {
                builder.add_index(name);
            }
        }
        if matches!(&state.last, Some(b) if b.entity_type() == entity_type) {
            if let Some(existing) = state.last.take() {
                for name in existing.indexes() {
                    builder.add_index(name);
                }
            }
        }
        state.builders.insert(entity_type.clone(), builder);
        Ok(self)
    }

    /// Request a secondary index on one entity type
    pub fn add_index(&mut self, entity_type: &EntityType, attribute: &str) -> Result<&mut Self> {
        self.state()?.builder_for(entity_type).add_index(attribute);
        Ok(self)
    }

    /// Request a secondary index on every entity type, present and future
    pub fn add_default_index(&mut self, attribute: &str) -> Result<&mut Self> {
        let state = self.state()?;
        if !state.default_indexes.iter().any(|a| a == attribute) {
            state.default_indexes.push(attribute.to_string());
        }
        for builder in state.builders.values_mut().chain(state.last.iter_mut()) {
            builder.add_index(attribute);
        }
        Ok(self)
    }

    /// Add an entity (last write wins)
    pub fn add_entity(&mut self, entity: Entity) -> Result<&mut Self> {
        let entity_type = entity.entity_type().clone();
        self.state()?.builder_for(&entity_type).add(entity)?;
        Ok(self)
    }

    /// Add several entities (last write wins)
    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) -> Result<&mut Self> {
        let state = self.state()?;
        for entity in entities {
            let entity_type = entity.entity_type().clone();
            state.builder_for(&entity_type).add(entity)?;
        }
        Ok(self)
    }

    /// Has an entity of this type and id been added?
    pub fn contains(&self, entity_type: &EntityType, id: i64) -> bool {
        self.state
            .as_ref()
            .and_then(|s| s.existing(entity_type))
            .is_some_and(|b| b.contains(id))
    }

    /// Entity types with a builder so far
    pub fn entity_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self
            .state
            .iter()
            .flat_map(|s| s.all_builders().map(|b| b.entity_type().clone()))
            .collect();
        types.sort();
        types
    }

    /// Synthesize bare `derived` entities from attribute values of `source` entities
    ///
    /// For every `source` entity added so far that carries `attribute`, a bare
    /// `derived` entity with that id is added unless one already exists.
    pub fn derive_entities(
        &mut self,
        derived: &EntityType,
        source: &EntityType,
        attribute: &TypedName<i64>,
    ) -> Result<&mut Self> {
        let state = self.state()?;
        let ids: Vec<i64> = match state.existing(source) {
            Some(builder) => builder.entities().filter_map(|e| e.get(attribute)).collect(),
            None => return Ok(self),
        };
        let target = state.builder_for(derived);
        let mut added = 0usize;
        for id in ids {
            if target.add_with(Entity::bare(derived.clone(), id), false)? {
                added += 1;
            }
        }
        debug!(
            target: "lensdb::store",
            derived = %derived,
            source = %source,
            attribute = attribute.name(),
            added,
            "Derived entities"
        );
        Ok(self)
    }

    /// Run the built-in derivations of every entity type present
    ///
    /// For example, `rating` entities derive `user` and `item` entities.
    pub fn apply_default_derivations(&mut self) -> Result<&mut Self> {
        self.state()?;
        let derivations: Vec<_> = self
            .entity_types()
            .iter()
            .filter_map(EntityDefaults::lookup)
            .flat_map(|d| d.derivations().to_vec())
            .collect();
        for d in derivations {
            self.derive_entities(d.derived_type(), d.source_type(), d.attribute())?;
        }
        Ok(self)
    }

    /// Freeze every collection into an [`EntityStore`]
    ///
    /// Succeeds once; later calls fail with [`Error::BuilderConsumed`].
    pub fn build(&mut self) -> Result<EntityStore> {
        let state = self.state.take().ok_or(Error::BuilderConsumed)?;
        let BuilderState { builders, last, .. } = state;
        let collections: BTreeMap<EntityType, Arc<_>> = builders
            .into_values()
            .chain(last)
            .map(|b| (b.entity_type().clone(), Arc::new(b.build())))
            .collect();
        let store = EntityStore::from_collections(collections);
        info!(
            target: "lensdb::store",
            types = store.len(),
            entities = store.entity_count(),
            "Built entity store"
        );
        Ok(store)
    }
}
