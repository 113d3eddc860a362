//! Entity views
//!
//! A view is a Rust type that entities are projected to before being handed
//! to callers. `Entity` itself is the generic view (identity projection);
//! domain views such as [`Rating`](crate::rating::Rating) check and extract
//! the attributes they need, and fail with [`Error::Projection`] rather than
//! return a partially-filled value.
//!
//! Mapping a view to the entity type it is read from is explicit: a
//! [`ViewRegistry`] supplied at configuration time, falling back to the
//! view's own [`EntityView::default_entity_type`].
//!
//! [`Error::Projection`]: crate::error::Error::Projection

use crate::entity::Entity;
use crate::error::Result;
use crate::types::EntityType;
use std::collections::BTreeMap;

/// A projection target for entities
pub trait EntityView: Sized + Send + 'static {
    /// Name of the view (used in registries and error messages)
    const VIEW_NAME: &'static str;

    /// Entity type this view reads from when none is registered
    fn default_entity_type() -> Option<EntityType> {
        None
    }

    /// Project an entity to this view
    fn project(entity: &Entity) -> Result<Self>;
}

impl EntityView for Entity {
    const VIEW_NAME: &'static str = "Entity";

    fn project(entity: &Entity) -> Result<Self> {
        Ok(entity.clone())
    }
}

/// Explicit view name → entity type mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRegistry {
    types: BTreeMap<String, EntityType>,
}

impl ViewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the entity type for a view name
    pub fn register(&mut self, view: impl Into<String>, entity_type: EntityType) -> &mut Self {
        self.types.insert(view.into(), entity_type);
        self
    }

    /// Register the entity type for a view
    pub fn register_view<V: EntityView>(&mut self, entity_type: EntityType) -> &mut Self {
        self.register(V::VIEW_NAME, entity_type)
    }

    /// Look up a view by name
    pub fn lookup(&self, view: &str) -> Option<&EntityType> {
        self.types.get(view)
    }

    /// Resolve a view: the registered type, else the view's default
    pub fn resolve<V: EntityView>(&self) -> Option<EntityType> {
        self.lookup(V::VIEW_NAME)
            .cloned()
            .or_else(V::default_entity_type)
    }

    /// Iterate (view name, entity type) mappings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityType)> {
        self.types.iter().map(|(view, t)| (view.as_str(), t))
    }

    /// Number of registered views
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
