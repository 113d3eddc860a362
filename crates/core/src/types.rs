//! Core identity types for lensdb
//!
//! This module defines:
//! - EntityType: interned name partitioning the store into collections

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Process-wide interner for entity type names.
///
/// Uses parking_lot::Mutex so a panicking caller cannot poison the table.
static TYPE_NAMES: Lazy<Mutex<FxHashSet<Arc<str>>>> =
    Lazy::new(|| Mutex::new(FxHashSet::default()));

/// An entity type
///
/// Entity types are interned, lower-cased names: `EntityType::new("Rating")`
/// and `EntityType::new("rating")` are the same type and share storage.
/// Every entity collection holds entities of exactly one type.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EntityType(Arc<str>);

impl EntityType {
    /// Get (or intern) the entity type with the given name
    pub fn new(name: &str) -> Self {
        let name = name.to_lowercase();
        let mut names = TYPE_NAMES.lock();
        if let Some(existing) = names.get(name.as_str()) {
            return EntityType(existing.clone());
        }
        let interned: Arc<str> = Arc::from(name);
        names.insert(interned.clone());
        EntityType(interned)
    }

    /// The type name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        // interned: pointer equality is the common case
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for EntityType {}

impl std::hash::Hash for EntityType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Ord for EntityType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for EntityType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityType({})", self.0)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(name: &str) -> Self {
        EntityType::new(name)
    }
}

impl From<String> for EntityType {
    fn from(name: String) -> Self {
        EntityType::new(&name)
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.0.to_string()
    }
}
