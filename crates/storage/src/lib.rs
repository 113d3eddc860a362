//! Storage layer for lensdb
//!
//! This crate implements the in-memory entity storage:
//! - EntityCollection: immutable, id-ordered entities of one type
//! - AttrIndex: secondary attribute indices (FxHashMap + SmallVec postings)
//! - packed column storage for entity types with a declared layout
//! - EntityCollectionBuilder: layout-checked, last-write-wins accumulation
//! - EntityStore / EntityStoreBuilder: per-type collections, derivations
//!
//! Everything here is read-only once built and can be shared across
//! threads behind an `Arc`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod collection_builder;
pub mod index;
mod packed;
pub mod store;
pub mod store_builder;

pub use collection::{Candidates, Entities, EntityCollection};
pub use collection_builder::EntityCollectionBuilder;
pub use index::{AttrIndex, Postings};
pub use store::EntityStore;
pub use store_builder::EntityStoreBuilder;
