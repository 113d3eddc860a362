//! Query engine for lensdb
//!
//! This crate sits on top of the storage layer:
//! - EntityQuery / EntityQueryBuilder: query specifications
//! - Query / GroupedQuery: fluent queries bound to a data access object
//! - DataAccess / DataAccessExt: the store abstraction
//! - EntityCollectionDao: in-memory data access with index-aware planning
//! - StoreConfig: `lensdb.toml` configuration
//!
//! Query execution is synchronous; results are lazy [`ObjectStream`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dao;
pub mod query;
pub mod stream;

pub use config::{StoreConfig, CONFIG_FILE_NAME};
pub use dao::{
    Access, DataAccess, DataAccessExt, EntityCollectionDao, EntityCollectionDaoBuilder, QueryPlan,
    SortStrategy, ViewResolver,
};
pub use query::{EntityQuery, EntityQueryBuilder, GroupedQuery, Query};
pub use stream::{IdBox, ObjectStream};
