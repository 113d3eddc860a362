//! Sort keys
//!
//! A sort key orders entities by one attribute, in one direction, optionally
//! through a custom value comparator. A list of sort keys forms a compound
//! ordering: the first key is primary, later keys break ties.

use crate::attribute::{AttrName, AttrType, TypedName};
use crate::entity::Entity;
use crate::value::AttrValue;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Custom comparison for attribute values
pub type ValueComparator = Arc<dyn Fn(&AttrValue, &AttrValue) -> Ordering + Send + Sync>;

/// A sort key
///
/// Entities missing the attribute sort before entities carrying it
/// (after them when descending).
#[derive(Clone)]
pub struct SortKey {
    attribute: AttrName,
    order: SortOrder,
    comparator: Option<ValueComparator>,
}

impl SortKey {
    /// Create a sort key
    pub fn new(attribute: AttrName, order: SortOrder) -> Self {
        SortKey {
            attribute,
            order,
            comparator: None,
        }
    }

    /// Ascending sort on a typed attribute
    pub fn ascending<T: AttrType>(name: &TypedName<T>) -> Self {
        SortKey::new(name.erase(), SortOrder::Ascending)
    }

    /// Descending sort on a typed attribute
    pub fn descending<T: AttrType>(name: &TypedName<T>) -> Self {
        SortKey::new(name.erase(), SortOrder::Descending)
    }

    /// Use a custom value comparator (direction still applies on top)
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&AttrValue, &AttrValue) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// The attribute sorted on
    pub fn attribute(&self) -> &AttrName {
        &self.attribute
    }

    /// The sort direction
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Does this key use a custom comparator?
    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }

    /// Compare two entities on this key
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        let name = self.attribute.name();
        let ordering = match (a.value(name), b.value(name)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => match &self.comparator {
                Some(cmp) => cmp(x, y),
                None => x.cmp(y),
            },
        };
        self.order.apply(ordering)
    }

    /// Does this key describe the same ordering as `other`?
    ///
    /// Keys with a custom comparator are never considered the same ordering
    /// as another key, since comparator closures cannot be compared.
    pub fn same_ordering(&self, other: &SortKey) -> bool {
        self.attribute == other.attribute
            && self.order == other.order
            && self.comparator.is_none()
            && other.comparator.is_none()
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        let same_comparator = match (&self.comparator, &other.comparator) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.attribute == other.attribute && self.order == other.order && same_comparator
    }
}

impl fmt::Debug for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("attribute", &self.attribute.name())
            .field("order", &self.order)
            .field("custom", &self.comparator.is_some())
            .finish()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        write!(f, "{} {}", self.attribute.name(), dir)?;
        if self.comparator.is_some() {
            f.write_str(" (custom)")?;
        }
        Ok(())
    }
}

/// Compare two entities under a compound ordering
pub fn compare_by_keys(keys: &[SortKey], a: &Entity, b: &Entity) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Is `keys` a prefix of `natural` (same attributes, same directions)?
pub fn is_sort_prefix(keys: &[SortKey], natural: &[SortKey]) -> bool {
    keys.len() <= natural.len()
        && keys
            .iter()
            .zip(natural.iter())
            .all(|(k, n)| k.same_ordering(n))
}
