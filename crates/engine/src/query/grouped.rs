//! Grouped fluent queries

use super::spec::EntityQuery;
use crate::dao::{DataAccess, DataAccessExt};
use crate::stream::{IdBox, ObjectStream};
use lensdb_core::{Entity, EntityView, Result, TypedName};

/// A query whose results are grouped by the value of a long attribute
///
/// Each group is an [`IdBox`] holding the shared attribute value and the
/// group's members in query order. Groups come in ascending key order when the
/// store groups natively; entities lacking the attribute are left out.
pub struct GroupedQuery<'a, V = Entity> {
    dao: &'a dyn DataAccess,
    query: EntityQuery<V>,
    attribute: TypedName<i64>,
}

impl<'a, V: EntityView> GroupedQuery<'a, V> {
    pub(crate) fn new(dao: &'a dyn DataAccess, query: EntityQuery<V>, attribute: TypedName<i64>) -> Self {
        GroupedQuery {
            dao,
            query,
            attribute,
        }
    }

    /// The grouping attribute
    pub fn attribute(&self) -> &TypedName<i64> {
        &self.attribute
    }

    /// The underlying query specification
    pub fn spec(&self) -> &EntityQuery<V> {
        &self.query
    }

    /// Stream the groups
    pub fn stream(&self) -> Result<ObjectStream<'a, Result<IdBox<Vec<V>>>>> {
        self.dao.stream_groups(&self.query, &self.attribute)
    }

    /// Collect the groups, failing on the first projection error
    pub fn get(&self) -> Result<Vec<IdBox<Vec<V>>>> {
        self.stream()?.collect()
    }

    /// Count the non-empty groups
    pub fn count(&self) -> Result<usize> {
        Ok(self
            .dao
            .stream_entity_groups(&self.query.untyped(), &self.attribute)?
            .count())
    }
}

impl<V> std::fmt::Debug for GroupedQuery<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupedQuery")
            .field("query", &self.query)
            .field("attribute", &self.attribute.name())
            .finish()
    }
}
