//! In-memory data access over an entity store
//!
//! Query execution:
//! 1. candidates come from the first filter (primary id index, secondary
//!    index, or a scan of the attribute) or from a full scan when the query
//!    has no filters
//! 2. the remaining filters are checked per candidate
//! 3. results are sorted in memory only when the requested order is not a
//!    prefix of the collection's natural (id) order
//!
//! Candidates are produced in natural order on every access path, so the
//! in-memory sort is stable with respect to id order.

use super::access::DataAccess;
use super::plan::QueryPlan;
use super::resolver::ViewResolver;
use crate::config::StoreConfig;
use crate::query::EntityQuery;
use crate::stream::{IdBox, ObjectStream};
use lensdb_core::{
    compare_by_keys, is_sort_prefix, Attribute, AttributeSet, Entity, EntityType, EntityView, Error, Result,
    TypedName, ViewRegistry,
};
use lensdb_storage::{EntityStore, EntityStoreBuilder};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/// Data access over an immutable in-memory [`EntityStore`]
#[derive(Debug)]
pub struct EntityCollectionDao {
    store: EntityStore,
    resolver: ViewResolver,
    sort_buffer_limit: Option<usize>,
}

impl EntityCollectionDao {
    /// Wrap a store, resolving views through their defaults
    pub fn new(store: EntityStore) -> Self {
        EntityCollectionDao {
            store,
            resolver: ViewResolver::default(),
            sort_buffer_limit: None,
        }
    }

    /// Start building a store and its data access object
    pub fn builder() -> EntityCollectionDaoBuilder {
        EntityCollectionDaoBuilder::new()
    }

    /// Create a data access object over a set of entities
    ///
    /// Entities are stored as given (last write wins for repeated ids); no
    /// entities are derived and no secondary indices are built.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Result<Self> {
        let mut builder = EntityStoreBuilder::new();
        builder.add_entities(entities)?;
        Ok(Self::new(builder.build()?))
    }

    /// Use a resolver built from an explicit registry
    pub fn with_view_registry(mut self, registry: ViewRegistry) -> Self {
        self.resolver = ViewResolver::new(registry);
        self
    }

    /// Cap the number of entities an in-memory sort may buffer
    pub fn with_sort_buffer_limit(mut self, limit: Option<usize>) -> Self {
        self.sort_buffer_limit = limit;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The in-memory sort limit, if any
    pub fn sort_buffer_limit(&self) -> Option<usize> {
        self.sort_buffer_limit
    }

    /// How a query would be executed
    pub fn plan<V>(&self, query: &EntityQuery<V>) -> QueryPlan {
        let collection = self.store.collection(query.entity_type());
        QueryPlan::new(collection.map(|c| c.as_ref()), query)
    }

    fn buffer_for_sort(
        &self,
        entities: impl Iterator<Item = Entity>,
        query: &EntityQuery,
    ) -> Result<Vec<Entity>> {
        let mut buffer = Vec::new();
        for entity in entities {
            if let Some(limit) = self.sort_buffer_limit {
                if buffer.len() >= limit {
                    return Err(Error::unsupported(format!(
                        "sorting {} requires buffering more than {} entities",
                        query, limit
                    )));
                }
            }
            buffer.push(entity);
        }
        if let Some(limit) = self.sort_buffer_limit {
            if buffer.len() > limit / 2 {
                warn!(
                    target: "lensdb::query",
                    buffered = buffer.len(),
                    limit,
                    query = %query,
                    "Large in-memory sort"
                );
            }
        }
        Ok(buffer)
    }
}

impl DataAccess for EntityCollectionDao {
    fn entity_types(&self) -> BTreeSet<EntityType> {
        self.store
            .entity_types()
            .filter(|t| self.store.collection(t).is_some_and(|c| !c.is_empty()))
            .cloned()
            .collect()
    }

    fn entity_ids(&self, entity_type: &EntityType) -> BTreeSet<i64> {
        self.store
            .collection(entity_type)
            .map(|c| c.id_set())
            .unwrap_or_default()
    }

    fn lookup_entity(&self, entity_type: &EntityType, id: i64) -> Option<Entity> {
        self.store.collection(entity_type)?.lookup(id)
    }

    fn stream_entities<'a>(&'a self, query: &EntityQuery) -> Result<ObjectStream<'a, Entity>> {
        let Some(collection) = self.store.collection(query.entity_type()) else {
            trace!(target: "lensdb::query", query = %query, "Unknown entity type, empty result");
            return Ok(ObjectStream::empty());
        };
        let plan = QueryPlan::new(Some(collection.as_ref()), query);
        debug!(target: "lensdb::query", query = %query, plan = %plan, "Executing query");

        let candidates: Box<dyn Iterator<Item = Entity> + 'a> = match query.filters().first() {
            Some(first) => Box::new(collection.find(first)),
            None => Box::new(collection.iter()),
        };
        let residual: Vec<Attribute> = query.filters().iter().skip(1).cloned().collect();
        let matching = candidates.filter(move |e| residual.iter().all(|f| e.satisfies(f)));

        if !plan.requires_sort() {
            return Ok(ObjectStream::new(matching));
        }
        let mut buffer = self.buffer_for_sort(matching, query)?;
        buffer.sort_by(|a, b| query.compare(a, b));
        trace!(target: "lensdb::query", sorted = buffer.len(), "Materialized sort");
        Ok(ObjectStream::new(buffer.into_iter()))
    }

    fn view_resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    fn stream_entity_groups<'a>(
        &'a self,
        query: &EntityQuery,
        attribute: &TypedName<i64>,
    ) -> Result<ObjectStream<'a, IdBox<Vec<Entity>>>> {
        let Some(collection) = self.store.collection(query.entity_type()) else {
            return Ok(ObjectStream::empty());
        };
        debug!(
            target: "lensdb::query",
            query = %query,
            group_by = attribute.name(),
            "Executing grouped query"
        );
        let query = query.clone();
        let natural = is_sort_prefix(query.sort_keys(), collection.sort_keys());
        let groups = collection.grouped(attribute).into_iter();
        Ok(ObjectStream::new(groups.filter_map(move |(key, members)| {
            let mut members: Vec<Entity> = members.into_iter().filter(|e| query.matches(e)).collect();
            if members.is_empty() {
                return None;
            }
            if !natural {
                members.sort_by(|a, b| compare_by_keys(query.sort_keys(), a, b));
            }
            Some(IdBox::new(key, members))
        })))
    }
}

// ============================================================================
// EntityCollectionDaoBuilder
// ============================================================================

/// Builder for an [`EntityCollectionDao`]
///
/// Wraps an [`EntityStoreBuilder`] and applies a [`StoreConfig`] at build:
/// default indices, default derivations, view mappings and the sort limit.
#[derive(Debug)]
pub struct EntityCollectionDaoBuilder {
    store: EntityStoreBuilder,
    config: StoreConfig,
    views: ViewRegistry,
}

impl Default for EntityCollectionDaoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCollectionDaoBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        EntityCollectionDaoBuilder {
            store: EntityStoreBuilder::new(),
            config: StoreConfig::default(),
            views: ViewRegistry::new(),
        }
    }

    /// Replace the configuration
    pub fn with_config(&mut self, config: StoreConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// The current configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Map a view to an entity type (overrides the configuration's mapping)
    pub fn register_view<V: EntityView>(&mut self, entity_type: EntityType) -> &mut Self {
        self.views.register_view::<V>(entity_type);
        self
    }

    /// Declare the layout of an entity type
    pub fn set_layout(&mut self, entity_type: &EntityType, layout: AttributeSet) -> Result<&mut Self> {
        self.store.set_layout(entity_type, layout)?;
        Ok(self)
    }

    /// Request a secondary index on one entity type
    pub fn add_index(&mut self, entity_type: &EntityType, attribute: &str) -> Result<&mut Self> {
        self.store.add_index(entity_type, attribute)?;
        Ok(self)
    }

    /// Add an entity (last write wins)
    pub fn add_entity(&mut self, entity: Entity) -> Result<&mut Self> {
        self.store.add_entity(entity)?;
        Ok(self)
    }

    /// Add several entities (last write wins)
    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) -> Result<&mut Self> {
        self.store.add_entities(entities)?;
        Ok(self)
    }

    /// Synthesize bare entities of one type from attribute values of another
    pub fn derive_entities(
        &mut self,
        derived: &EntityType,
        source: &EntityType,
        attribute: &TypedName<i64>,
    ) -> Result<&mut Self> {
        self.store.derive_entities(derived, source, attribute)?;
        Ok(self)
    }

    /// Build the store and wrap it
    ///
    /// Succeeds once; later calls fail with `Error::BuilderConsumed`.
    pub fn build(&mut self) -> Result<EntityCollectionDao> {
        if self.store.is_consumed() {
            return Err(Error::BuilderConsumed);
        }
        self.config.validate()?;
        for attribute in &self.config.default_indexes {
            self.store.add_default_index(attribute)?;
        }
        if self.config.derive_defaults {
            self.store.apply_default_derivations()?;
        }
        let store = self.store.build()?;

        let mut registry = self.config.view_registry();
        for (view, entity_type) in self.views.iter() {
            registry.register(view, entity_type.clone());
        }
        Ok(EntityCollectionDao::new(store)
            .with_view_registry(registry)
            .with_sort_buffer_limit(self.config.sort_buffer_limit))
    }
}
