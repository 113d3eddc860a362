//! Error types for lensdb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Errors fall into three families:
//! - **Configuration**: caller misuse (unresolved view mapping, bad projection,
//!   duplicate layout, malformed config file)
//! - **Capability**: a store cannot execute a particular query
//! - **Programming**: builder misuse (consumed builder, mismatched types)
//!
//! Absence is never an error: missing ids and unknown entity types are
//! reported as `None` or empty results.

use crate::types::EntityType;
use crate::value::ValueType;
use std::io;
use thiserror::Error;

/// Result type alias for lensdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lensdb
#[derive(Debug, Error)]
pub enum Error {
    /// No entity type is registered for a view type
    #[error("No entity type mapping for view '{view}'")]
    NoViewMapping {
        /// View name
        view: &'static str,
    },

    /// An entity cannot be projected to the requested view
    #[error("Cannot project {entity_type} entity {id} to view '{view}': {reason}")]
    Projection {
        /// Requested view
        view: &'static str,
        /// Type of the entity being projected
        entity_type: EntityType,
        /// Id of the entity being projected
        id: i64,
        /// Why projection failed
        reason: String,
    },

    /// The store cannot satisfy the query
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    /// A single-use builder was used after `build()`
    #[error("Builder already consumed by build()")]
    BuilderConsumed,

    /// A layout was requested for a type that already has one, or already has entities
    #[error("Cannot set layout for {entity_type}: {reason}")]
    LayoutConflict {
        /// Entity type
        entity_type: EntityType,
        /// Why the layout was refused
        reason: &'static str,
    },

    /// An attribute value does not have the type declared for it
    #[error("Attribute '{name}' expects {expected}, got {actual}")]
    AttributeType {
        /// Attribute name
        name: String,
        /// Declared value type
        expected: ValueType,
        /// Value type found
        actual: ValueType,
    },

    /// An entity was routed to a builder for a different type
    #[error("Entity type mismatch: expected {expected}, got {actual}")]
    EntityTypeMismatch {
        /// Type accepted by the builder
        expected: EntityType,
        /// Type of the offered entity
        actual: EntityType,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error (configuration loading)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a projection error
    pub fn projection(
        view: &'static str,
        entity_type: &EntityType,
        id: i64,
        reason: impl Into<String>,
    ) -> Self {
        Error::Projection {
            view,
            entity_type: entity_type.clone(),
            id,
            reason: reason.into(),
        }
    }

    /// Create an unsupported-query error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Error::UnsupportedQuery(reason.into())
    }

    /// Is this a caller configuration error?
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::NoViewMapping { .. }
                | Error::Projection { .. }
                | Error::LayoutConflict { .. }
                | Error::Config(_)
                | Error::Io(_)
        )
    }

    /// Is this a store capability limit?
    pub fn is_capability(&self) -> bool {
        matches!(self, Error::UnsupportedQuery(_))
    }

    /// Is this a programming error (builder misuse)?
    pub fn is_programming(&self) -> bool {
        matches!(
            self,
            Error::BuilderConsumed | Error::AttributeType { .. } | Error::EntityTypeMismatch { .. }
        )
    }
}
