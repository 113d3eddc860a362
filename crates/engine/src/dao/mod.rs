//! Data access objects
//!
//! - [`DataAccess`] / [`DataAccessExt`]: the store abstraction and its
//!   view-generic conveniences
//! - [`ViewResolver`]: view type → entity type resolution
//! - [`EntityCollectionDao`]: the in-memory implementation over an
//!   [`EntityStore`](lensdb_storage::EntityStore)
//! - [`QueryPlan`]: how the in-memory implementation answers a query

mod access;
mod collection;
mod plan;
mod resolver;

pub use access::{DataAccess, DataAccessExt};
pub use collection::{EntityCollectionDao, EntityCollectionDaoBuilder};
pub use plan::{Access, QueryPlan, SortStrategy};
pub use resolver::ViewResolver;
