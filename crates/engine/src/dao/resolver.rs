//! View → entity type resolution
//!
//! Resolution consults an explicit [`ViewRegistry`] first, then the view's
//! own default entity type. Results are cached per view type; concurrent
//! first resolutions compute the same answer and the first stored wins.

use dashmap::DashMap;
use lensdb_core::{EntityType, EntityView, Error, Result, ViewRegistry};
use once_cell::sync::Lazy;
use std::any::TypeId;

static GLOBAL_RESOLVER: Lazy<ViewResolver> = Lazy::new(ViewResolver::default);

/// Resolves view types to the entity types they are read from
#[derive(Debug, Default)]
pub struct ViewResolver {
    registry: ViewRegistry,
    cache: DashMap<TypeId, EntityType>,
}

impl ViewResolver {
    /// Create a resolver over an explicit registry
    pub fn new(registry: ViewRegistry) -> Self {
        ViewResolver {
            registry,
            cache: DashMap::new(),
        }
    }

    /// Process-wide resolver using only view defaults
    pub fn global() -> &'static ViewResolver {
        &GLOBAL_RESOLVER
    }

    /// The explicit registry
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Resolve the entity type for a view, if any
    pub fn resolve<V: EntityView>(&self) -> Option<EntityType> {
        let type_id = TypeId::of::<V>();
        if let Some(cached) = self.cache.get(&type_id) {
            return Some(cached.value().clone());
        }
        let resolved = self.registry.resolve::<V>()?;
        let entry = self.cache.entry(type_id).or_insert(resolved);
        Some(entry.value().clone())
    }

    /// Resolve the entity type for a view, failing if it has none
    pub fn require<V: EntityView>(&self) -> Result<EntityType> {
        self.resolve::<V>().ok_or(Error::NoViewMapping { view: V::VIEW_NAME })
    }

    /// Number of cached resolutions
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
