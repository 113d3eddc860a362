//! Core entity model for lensdb
//!
//! This crate defines the foundational types used throughout the system:
//! - EntityType: interned entity type names
//! - AttrValue / ValueType: attribute values and their types
//! - TypedName / AttrName / Attribute / AttributeSet: attribute identifiers
//! - Entity / EntityBuilder: immutable typed records
//! - SortKey / SortOrder: compound orderings over entities
//! - EntityView / ViewRegistry: projection of entities to Rust view types
//! - Rating: the rating view
//! - EntityDefaults / EntityDerivation: defaults for the common types
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod common;
pub mod defaults;
pub mod entity;
pub mod error;
pub mod rating;
pub mod sort;
pub mod types;
pub mod value;
pub mod view;

pub use attribute::{AttrName, AttrType, Attribute, AttributeSet, TypedName};
pub use common::{CommonAttributes, CommonTypes};
pub use defaults::{EntityDefaults, EntityDerivation};
pub use entity::{Entity, EntityBuilder, ID_ATTRIBUTE};
pub use error::{Error, Result};
pub use rating::Rating;
pub use sort::{compare_by_keys, is_sort_prefix, SortKey, SortOrder, ValueComparator};
pub use types::EntityType;
pub use value::{AttrValue, ValueType};
pub use view::{EntityView, ViewRegistry};
