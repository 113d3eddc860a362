//! The data access abstraction
//!
//! [`DataAccess`] is the object-safe interface every backing store
//! implements. Stores supply four primitives (types, ids, lookup, and
//! query streaming); grouping and view resolution have generic default
//! implementations that stores may override.
//!
//! [`DataAccessExt`] layers the view-generic conveniences (fluent queries,
//! projected streams) over any `DataAccess`, including `dyn DataAccess`.

use super::resolver::ViewResolver;
use crate::query::{EntityQuery, EntityQueryBuilder, GroupedQuery, Query};
use crate::stream::{IdBox, ObjectStream};
use lensdb_core::{Entity, EntityType, EntityView, Result, SortKey, TypedName};
use std::collections::BTreeSet;

/// Read access to a store of entities
pub trait DataAccess: Send + Sync {
    /// Entity types with at least one entity
    fn entity_types(&self) -> BTreeSet<EntityType>;

    /// Ids of the entities of a type (empty for unknown types)
    fn entity_ids(&self, entity_type: &EntityType) -> BTreeSet<i64>;

    /// Look up an entity by type and id
    fn lookup_entity(&self, entity_type: &EntityType, id: i64) -> Option<Entity>;

    /// Stream the entities matching a query, in the query's order
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedQuery` if the store cannot execute the query.
    fn stream_entities<'a>(&'a self, query: &EntityQuery) -> Result<ObjectStream<'a, Entity>>;

    /// Resolver mapping view types to entity types
    fn view_resolver(&self) -> &ViewResolver {
        ViewResolver::global()
    }

    /// Stream the entities matching a query, grouped by a long attribute
    ///
    /// The default implementation re-issues the query with `attribute` as the
    /// primary sort key and splits the stream where the key changes, so it
    /// relies on `stream_entities` honouring sort keys. Entities lacking the
    /// attribute are skipped.
    fn stream_entity_groups<'a>(
        &'a self,
        query: &EntityQuery,
        attribute: &TypedName<i64>,
    ) -> Result<ObjectStream<'a, IdBox<Vec<Entity>>>> {
        let mut builder = EntityQueryBuilder::new(query.entity_type().clone());
        for filter in query.filters() {
            builder.add_filter(filter.clone());
        }
        builder
            .add_sort_key(SortKey::ascending(attribute))
            .add_sort_keys(query.sort_keys().iter().cloned());
        let sorted = self.stream_entities(&builder.build())?;
        Ok(ObjectStream::new(SortedGroups::new(sorted, attribute.clone())))
    }
}

/// Splits a stream sorted by a group attribute into groups of equal keys
struct SortedGroups<I> {
    source: I,
    attribute: TypedName<i64>,
    pending: Option<(i64, Entity)>,
}

impl<I: Iterator<Item = Entity>> SortedGroups<I> {
    fn new(source: I, attribute: TypedName<i64>) -> Self {
        SortedGroups {
            source,
            attribute,
            pending: None,
        }
    }

    fn next_keyed(&mut self) -> Option<(i64, Entity)> {
        let attribute = &self.attribute;
        self.source
            .by_ref()
            .find_map(|e| e.get(attribute).map(|key| (key, e)))
    }
}

impl<I: Iterator<Item = Entity>> Iterator for SortedGroups<I> {
    type Item = IdBox<Vec<Entity>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, first) = match self.pending.take() {
            Some(pending) => pending,
            None => self.next_keyed()?,
        };
        let mut members = vec![first];
        while let Some((next_key, entity)) = self.next_keyed() {
            if next_key != key {
                self.pending = Some((next_key, entity));
                break;
            }
            members.push(entity);
        }
        Some(IdBox::new(key, members))
    }
}

// ============================================================================
// DataAccessExt
// ============================================================================

/// View-generic operations over any [`DataAccess`]
pub trait DataAccessExt: DataAccess {
    /// This store as a trait object
    fn as_access(&self) -> &dyn DataAccess;

    /// Start a fluent query over an entity type
    fn query(&self, entity_type: &EntityType) -> Query<'_, Entity> {
        Query::new(self.as_access(), entity_type.clone())
    }

    /// Start a fluent query over the entity type a view resolves to
    ///
    /// # Errors
    ///
    /// `Error::NoViewMapping` if the view resolves to no entity type.
    fn query_view<V: EntityView>(&self) -> Result<Query<'_, V>> {
        let entity_type = self.view_resolver().require::<V>()?;
        Ok(Query::new(self.as_access(), entity_type))
    }

    /// Stream every entity of a type in natural order
    fn stream_all(&self, entity_type: &EntityType) -> Result<ObjectStream<'_, Entity>> {
        self.stream_entities(&EntityQueryBuilder::new(entity_type.clone()).build())
    }

    /// Stream query results projected to the query's view
    ///
    /// Each item is the projection of one entity; projection failures are
    /// reported per item.
    fn stream<V: EntityView>(&self, query: &EntityQuery<V>) -> Result<ObjectStream<'_, Result<V>>> {
        let entities = self.stream_entities(&query.untyped())?;
        Ok(entities.map_items(|e| V::project(&e)))
    }

    /// Stream grouped query results projected to the query's view
    fn stream_groups<V: EntityView>(
        &self,
        query: &EntityQuery<V>,
        attribute: &TypedName<i64>,
    ) -> Result<ObjectStream<'_, Result<IdBox<Vec<V>>>>> {
        let groups = self.stream_entity_groups(&query.untyped(), attribute)?;
        Ok(groups.map_items(|group| {
            let (id, entities) = group.into_parts();
            let views = entities.iter().map(V::project).collect::<Result<Vec<V>>>()?;
            Ok(IdBox::new(id, views))
        }))
    }

    /// Look up an entity and project it to a view
    fn lookup_as<V: EntityView>(&self, entity_type: &EntityType, id: i64) -> Result<Option<V>> {
        self.lookup_entity(entity_type, id)
            .map(|e| V::project(&e))
            .transpose()
    }

    /// Start a grouped fluent query
    fn query_groups(&self, entity_type: &EntityType, attribute: &TypedName<i64>) -> GroupedQuery<'_, Entity> {
        self.query(entity_type).group_by(attribute)
    }
}

impl<D: DataAccess> DataAccessExt for D {
    fn as_access(&self) -> &dyn DataAccess {
        self
    }
}

impl DataAccessExt for dyn DataAccess + '_ {
    fn as_access(&self) -> &dyn DataAccess {
        self
    }
}
