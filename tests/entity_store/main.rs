//! Entity Store Test Suite
//!
//! Tests for building entity stores and reading them back.
//!
//! ## Test Structure
//!
//! - **builder_semantics**: last-write-wins, layouts, single use
//! - **derivation**: derived entities and their precedence
//! - **lookup_properties**: round-trip lookup and id uniqueness (proptest)
//! - **config_loading**: `lensdb.toml` loading and application
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test entity_store
//! ```

#[path = "../common/mod.rs"]
mod common;

mod builder_semantics;
mod config_loading;
mod derivation;
mod lookup_properties;
