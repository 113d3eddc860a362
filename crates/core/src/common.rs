//! Common entity types and attributes shared across the toolkit

use crate::attribute::TypedName;
use crate::types::EntityType;

/// Common entity types
pub struct CommonTypes;

impl CommonTypes {
    /// Users
    pub fn user() -> EntityType {
        EntityType::new("user")
    }

    /// Items
    pub fn item() -> EntityType {
        EntityType::new("item")
    }

    /// Explicit ratings
    pub fn rating() -> EntityType {
        EntityType::new("rating")
    }
}

/// Common attributes
pub struct CommonAttributes;

impl CommonAttributes {
    /// The entity id
    pub const ENTITY_ID: TypedName<i64> = TypedName::new("id");
    /// Referenced user id
    pub const USER_ID: TypedName<i64> = TypedName::new("user");
    /// Referenced item id
    pub const ITEM_ID: TypedName<i64> = TypedName::new("item");
    /// Rating value
    pub const RATING: TypedName<f64> = TypedName::new("rating");
    /// Event timestamp
    pub const TIMESTAMP: TypedName<i64> = TypedName::new("timestamp");
    /// Human-readable name
    pub const NAME: TypedName<String> = TypedName::new("name");
}
