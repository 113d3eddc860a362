//! Mutable builder for entity queries

use super::spec::EntityQuery;
use lensdb_core::{AttrType, Attribute, Entity, EntityType, EntityView, SortKey, TypedName};

/// Builder for [`EntityQuery`]
///
/// ```ignore
/// let query = EntityQueryBuilder::new(CommonTypes::rating())
///     .add_filter_field(&CommonAttributes::USER_ID, 10)
///     .add_sort_key(SortKey::descending(&CommonAttributes::RATING))
///     .build_with_view::<Rating>();
/// ```
#[derive(Debug, Clone)]
pub struct EntityQueryBuilder {
    entity_type: EntityType,
    filters: Vec<Attribute>,
    sort_keys: Vec<SortKey>,
}

impl EntityQueryBuilder {
    /// Start a query over entities of a type
    pub fn new(entity_type: EntityType) -> Self {
        EntityQueryBuilder {
            entity_type,
            filters: Vec::new(),
            sort_keys: Vec::new(),
        }
    }

    /// The queried entity type
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Require a typed attribute to equal a value
    pub fn add_filter_field<T: AttrType>(&mut self, name: &TypedName<T>, value: T) -> &mut Self {
        self.add_filter(name.attribute(value))
    }

    /// Require an attribute condition to hold
    pub fn add_filter(&mut self, filter: Attribute) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Append a sort key (later keys break ties of earlier ones)
    pub fn add_sort_key(&mut self, key: SortKey) -> &mut Self {
        self.sort_keys.push(key);
        self
    }

    /// Append several sort keys
    pub fn add_sort_keys(&mut self, keys: impl IntoIterator<Item = SortKey>) -> &mut Self {
        self.sort_keys.extend(keys);
        self
    }

    /// An independent copy of this builder
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Build a query over the generic entity view
    pub fn build(&self) -> EntityQuery<Entity> {
        self.build_with_view()
    }

    /// Build a query projecting results to the view `V`
    pub fn build_with_view<V: EntityView>(&self) -> EntityQuery<V> {
        EntityQuery::from_parts(
            self.entity_type.clone(),
            self.filters.clone(),
            self.sort_keys.clone(),
        )
    }
}
