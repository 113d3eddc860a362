//! Immutable query specifications

use super::builder::EntityQueryBuilder;
use lensdb_core::{compare_by_keys, Attribute, Entity, EntityType, EntityView, SortKey};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// An immutable query over entities of one type
///
/// Selects the entities of `entity_type` that satisfy every filter, ordered
/// by the sort keys (natural store order when there are none), and projects
/// them to the view `V`.
pub struct EntityQuery<V = Entity> {
    entity_type: EntityType,
    filters: Vec<Attribute>,
    sort_keys: Vec<SortKey>,
    _view: PhantomData<fn() -> V>,
}

impl<V> EntityQuery<V> {
    pub(crate) fn from_parts(
        entity_type: EntityType,
        filters: Vec<Attribute>,
        sort_keys: Vec<SortKey>,
    ) -> Self {
        EntityQuery {
            entity_type,
            filters,
            sort_keys,
            _view: PhantomData,
        }
    }

    /// The queried entity type
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Equality conditions, all of which must hold
    pub fn filters(&self) -> &[Attribute] {
        &self.filters
    }

    /// Requested ordering (primary key first)
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// Does the entity have the right type and satisfy every filter?
    pub fn matches(&self, entity: &Entity) -> bool {
        entity.entity_type() == &self.entity_type && self.filters.iter().all(|f| entity.satisfies(f))
    }

    /// Compare two entities under the query's sort keys
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        compare_by_keys(&self.sort_keys, a, b)
    }

    /// The query's ordering as a comparison function
    pub fn comparator(&self) -> impl Fn(&Entity, &Entity) -> Ordering + '_ {
        move |a, b| self.compare(a, b)
    }

    /// A builder initialized with this query's type, filters and sort keys
    pub fn to_builder(&self) -> EntityQueryBuilder {
        let mut builder = EntityQueryBuilder::new(self.entity_type.clone());
        for filter in &self.filters {
            builder.add_filter(filter.clone());
        }
        builder.add_sort_keys(self.sort_keys.iter().cloned());
        builder
    }

    /// The same query over the generic entity view
    pub fn untyped(&self) -> EntityQuery<Entity> {
        self.with_view()
    }

    /// The same query projected to another view
    pub fn with_view<V2>(&self) -> EntityQuery<V2> {
        EntityQuery::from_parts(
            self.entity_type.clone(),
            self.filters.clone(),
            self.sort_keys.clone(),
        )
    }
}

impl<V: EntityView> EntityQuery<V> {
    /// Name of the view results are projected to
    pub fn view_name(&self) -> &'static str {
        V::VIEW_NAME
    }
}

impl<V> Clone for EntityQuery<V> {
    fn clone(&self) -> Self {
        self.with_view()
    }
}

impl<V> PartialEq for EntityQuery<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type == other.entity_type
            && self.filters == other.filters
            && self.sort_keys == other.sort_keys
    }
}

impl<V> fmt::Debug for EntityQuery<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("entity_type", &self.entity_type)
            .field("filters", &self.filters)
            .field("sort_keys", &self.sort_keys)
            .finish()
    }
}

impl<V> fmt::Display for EntityQuery<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity_type)?;
        for (i, filter) in self.filters.iter().enumerate() {
            f.write_str(if i == 0 { " where " } else { " and " })?;
            write!(f, "{}", filter)?;
        }
        for (i, key) in self.sort_keys.iter().enumerate() {
            f.write_str(if i == 0 { " order by " } else { ", " })?;
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}
