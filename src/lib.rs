//! lensdb - Embedded, typed, queryable entity store for recommender toolkits
//!
//! lensdb holds users, items, ratings and other typed entities in memory and
//! answers filtered, sorted and grouped queries over them, projecting results
//! to Rust view types.
//!
//! # Quick Start
//!
//! ```ignore
//! use lensdb::{CommonAttributes, DataAccessExt, EntityCollectionDao, Rating, SortOrder};
//!
//! let dao = EntityCollectionDao::from_entities(vec![
//!     Rating::new(1, 10, 100, 3.5).to_entity(),
//!     Rating::new(2, 10, 101, 4.0).to_entity(),
//! ])?;
//!
//! let ratings: Vec<Rating> = dao
//!     .query_view::<Rating>()?
//!     .with_attribute(&CommonAttributes::USER_ID, 10)
//!     .order_by_with(&CommonAttributes::RATING, SortOrder::Descending)
//!     .get()?;
//! ```
//!
//! # Architecture
//!
//! - `lensdb-core`: entity model, attributes, sort keys, views, errors
//! - `lensdb-storage`: immutable indexed collections and their builders
//! - `lensdb-engine`: queries, data access objects, configuration

pub use lensdb_core::*;
pub use lensdb_engine::*;
pub use lensdb_storage::{
    Candidates, Entities, EntityCollection, EntityCollectionBuilder, EntityStore, EntityStoreBuilder,
};
