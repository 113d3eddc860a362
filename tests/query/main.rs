//! Query Test Suite
//!
//! Tests for querying entities through the data access abstraction.
//!
//! ## Test Structure
//!
//! - **rating_scenarios**: the canonical two-rating filter/sort/group cases
//! - **fluent_queries**: the fluent query surface and view projection
//! - **filter_sort_properties**: filter, sort and grouping properties (proptest)
//! - **grouping_backends**: native grouping vs. the generic default
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test query
//! ```

#[path = "../common/mod.rs"]
mod common;

mod fluent_queries;
mod grouping_backends;
mod rating_scenarios;
