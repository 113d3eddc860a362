//! Execution plans for collection queries
//!
//! A plan records how [`EntityCollectionDao`](super::EntityCollectionDao)
//! will answer a query: where candidates come from, how many filters remain
//! to be checked per candidate, and whether the result must be sorted in
//! memory.

use crate::query::EntityQuery;
use lensdb_core::{is_sort_prefix, EntityType};
use lensdb_storage::EntityCollection;
use std::fmt;

/// Where candidate entities come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The store has no collection for the type
    Empty,
    /// Every entity of the collection, in natural order
    Scan,
    /// Entities matching the first filter, via the primary id index
    IdLookup,
    /// Entities matching the first filter, via a secondary index
    IndexProbe {
        /// Indexed attribute
        attribute: String,
    },
    /// Entities matching the first filter, found by scanning
    FilteredScan {
        /// Unindexed attribute
        attribute: String,
    },
}

/// How results are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// The query asks for no order; natural order is used
    Unordered,
    /// The requested order is a prefix of the collection's natural order
    Natural,
    /// Results are buffered and stable-sorted in memory
    Materialize,
}

/// An execution plan for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    entity_type: EntityType,
    access: Access,
    residual_filters: usize,
    sort: SortStrategy,
}

impl QueryPlan {
    /// Plan a query against a collection (`None` if the type is absent)
    pub fn new<V>(collection: Option<&EntityCollection>, query: &EntityQuery<V>) -> Self {
        let entity_type = query.entity_type().clone();
        let Some(collection) = collection else {
            return QueryPlan {
                entity_type,
                access: Access::Empty,
                residual_filters: 0,
                sort: SortStrategy::Unordered,
            };
        };

        let access = match query.filters().first() {
            None => Access::Scan,
            Some(first) => {
                let attribute = first.name().name();
                if attribute == lensdb_core::ID_ATTRIBUTE {
                    Access::IdLookup
                } else if collection.has_index(attribute) {
                    Access::IndexProbe {
                        attribute: attribute.to_string(),
                    }
                } else {
                    Access::FilteredScan {
                        attribute: attribute.to_string(),
                    }
                }
            }
        };
        let sort = if query.sort_keys().is_empty() {
            SortStrategy::Unordered
        } else if is_sort_prefix(query.sort_keys(), collection.sort_keys()) {
            SortStrategy::Natural
        } else {
            SortStrategy::Materialize
        };

        QueryPlan {
            entity_type,
            access,
            residual_filters: query.filters().len().saturating_sub(1),
            sort,
        }
    }

    /// The queried entity type
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Candidate source
    pub fn access(&self) -> &Access {
        &self.access
    }

    /// Filters checked against each candidate after access
    pub fn residual_filters(&self) -> usize {
        self.residual_filters
    }

    /// Ordering strategy
    pub fn sort(&self) -> SortStrategy {
        self.sort
    }

    /// Does the plan buffer results for an in-memory sort?
    pub fn requires_sort(&self) -> bool {
        self.sort == SortStrategy::Materialize
    }

    /// One-line human-readable description
    pub fn explain(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.access {
            Access::Empty => return write!(f, "empty({})", self.entity_type),
            Access::Scan => write!(f, "scan({})", self.entity_type)?,
            Access::IdLookup => write!(f, "id-lookup({})", self.entity_type)?,
            Access::IndexProbe { attribute } => {
                write!(f, "index-probe({}.{})", self.entity_type, attribute)?
            }
            Access::FilteredScan { attribute } => {
                write!(f, "filtered-scan({}.{})", self.entity_type, attribute)?
            }
        }
        if self.residual_filters > 0 {
            write!(f, " -> filter({})", self.residual_filters)?;
        }
        match self.sort {
            SortStrategy::Unordered => Ok(()),
            SortStrategy::Natural => f.write_str(" -> natural-order"),
            SortStrategy::Materialize => f.write_str(" -> sort"),
        }
    }
}
