//! Entity queries
//!
//! - [`EntityQuery`]: immutable specification (type, filters, sort keys, view)
//! - [`EntityQueryBuilder`]: mutable builder producing specifications
//! - [`Query`] / [`GroupedQuery`]: fluent queries bound to a data access object

mod builder;
mod fluent;
mod grouped;
mod spec;

pub use builder::EntityQueryBuilder;
pub use fluent::Query;
pub use grouped::GroupedQuery;
pub use spec::EntityQuery;
