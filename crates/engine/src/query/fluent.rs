//! Fluent queries bound to a data access object
//!
//! ```ignore
//! let top: Vec<Rating> = dao
//!     .query_view::<Rating>()?
//!     .with_attribute(&CommonAttributes::USER_ID, 10)
//!     .order_by_with(&CommonAttributes::RATING, SortOrder::Descending)
//!     .get()?;
//! ```
//!
//! Every refinement returns a new query; the receiver is left untouched, so a
//! partially built query can be reused as a template.

use super::builder::EntityQueryBuilder;
use super::grouped::GroupedQuery;
use super::spec::EntityQuery;
use crate::dao::{DataAccess, DataAccessExt};
use crate::stream::ObjectStream;
use lensdb_core::{
    AttrType, AttrValue, Attribute, Entity, EntityType, EntityView, Result, SortKey, SortOrder,
    TypedName,
};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// A fluent query over a data access object
pub struct Query<'a, V = Entity> {
    dao: &'a dyn DataAccess,
    builder: EntityQueryBuilder,
    _view: PhantomData<fn() -> V>,
}

impl<'a, V: EntityView> Query<'a, V> {
    pub(crate) fn new(dao: &'a dyn DataAccess, entity_type: EntityType) -> Self {
        Query {
            dao,
            builder: EntityQueryBuilder::new(entity_type),
            _view: PhantomData,
        }
    }

    fn refine(&self, f: impl FnOnce(&mut EntityQueryBuilder)) -> Self {
        let mut builder = self.builder.copy();
        f(&mut builder);
        Query {
            dao: self.dao,
            builder,
            _view: PhantomData,
        }
    }

    /// Require a typed attribute to equal a value
    pub fn with_attribute<T: AttrType>(&self, name: &TypedName<T>, value: T) -> Self {
        self.refine(|b| {
            b.add_filter_field(name, value);
        })
    }

    /// Require an attribute to equal a dynamically typed value
    pub fn with_value(&self, name: &str, value: AttrValue) -> Self {
        let filter = Attribute::untyped(name.to_string(), value);
        self.refine(|b| {
            b.add_filter(filter);
        })
    }

    /// Order ascending by an attribute (after any existing keys)
    pub fn order_by<T: AttrType>(&self, name: &TypedName<T>) -> Self {
        self.order_by_with(name, SortOrder::Ascending)
    }

    /// Order by an attribute in the given direction (after any existing keys)
    pub fn order_by_with<T: AttrType>(&self, name: &TypedName<T>, order: SortOrder) -> Self {
        self.order_by_key(SortKey::new(name.erase(), order))
    }

    /// Order by an arbitrary sort key, such as one with a custom comparator
    pub fn order_by_key(&self, key: SortKey) -> Self {
        self.refine(|b| {
            b.add_sort_key(key);
        })
    }

    /// The same query projected to another view
    pub fn as_type<V2: EntityView>(&self) -> Query<'a, V2> {
        Query {
            dao: self.dao,
            builder: self.builder.copy(),
            _view: PhantomData,
        }
    }

    /// Group results by a long-valued attribute
    pub fn group_by(&self, attribute: &TypedName<i64>) -> GroupedQuery<'a, V> {
        GroupedQuery::new(self.dao, self.spec(), attribute.clone())
    }

    /// The query specification
    pub fn spec(&self) -> EntityQuery<V> {
        self.builder.build_with_view()
    }

    /// Stream the results
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedQuery` if the store cannot execute the query.
    /// Projection failures are reported per item.
    pub fn stream(&self) -> Result<ObjectStream<'a, Result<V>>> {
        self.dao.stream(&self.spec())
    }

    /// Collect the results, failing on the first projection error
    pub fn get(&self) -> Result<Vec<V>> {
        self.stream()?.collect()
    }

    /// Count matching entities
    pub fn count(&self) -> Result<usize> {
        Ok(self.dao.stream_entities(&self.builder.build())?.count())
    }

    /// Distinct values of an attribute among matching entities, ascending
    ///
    /// Entities lacking the attribute (or holding another value type)
    /// contribute nothing. Values are deduplicated under the total order of
    /// [`AttrValue`], so double attributes work too.
    pub fn value_set<T: AttrType>(&self, name: &TypedName<T>) -> Result<Vec<T>> {
        let entities = self.dao.stream_entities(&self.builder.build())?;
        let distinct: BTreeSet<AttrValue> = entities
            .filter_map(|e| e.value(name.name()).cloned())
            .filter(|v| v.value_type() == T::VALUE_TYPE)
            .collect();
        Ok(distinct.iter().filter_map(T::from_value).collect())
    }
}

impl<V> Clone for Query<'_, V> {
    fn clone(&self) -> Self {
        Query {
            dao: self.dao,
            builder: self.builder.copy(),
            _view: PhantomData,
        }
    }
}

impl<V> std::fmt::Debug for Query<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").field("builder", &self.builder).finish()
    }
}
