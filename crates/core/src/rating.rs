//! Rating view
//!
//! A rating is a user's explicit preference for an item. Rating entities
//! carry `user`, `item` and `rating` attributes and an optional `timestamp`.

use crate::common::{CommonAttributes, CommonTypes};
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::types::EntityType;
use crate::view::EntityView;

/// A rating
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    /// Rating entity id
    pub id: i64,
    /// Rating user
    pub user: i64,
    /// Rated item
    pub item: i64,
    /// Rating value
    pub value: f64,
    /// When the rating was made, if known
    pub timestamp: Option<i64>,
}

impl Rating {
    /// Create a rating without a timestamp
    pub fn new(id: i64, user: i64, item: i64, value: f64) -> Self {
        Rating {
            id,
            user,
            item,
            value,
            timestamp: None,
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Convert to a `rating` entity
    pub fn to_entity(&self) -> Entity {
        let mut builder = Entity::builder(CommonTypes::rating(), self.id)
            .set(&CommonAttributes::USER_ID, self.user)
            .set(&CommonAttributes::ITEM_ID, self.item)
            .set(&CommonAttributes::RATING, self.value);
        if let Some(ts) = self.timestamp {
            builder = builder.set(&CommonAttributes::TIMESTAMP, ts);
        }
        builder.build()
    }
}

impl EntityView for Rating {
    const VIEW_NAME: &'static str = "Rating";

    fn default_entity_type() -> Option<EntityType> {
        Some(CommonTypes::rating())
    }

    fn project(entity: &Entity) -> Result<Self> {
        let missing = |attr: &str| {
            Error::projection(
                Self::VIEW_NAME,
                entity.entity_type(),
                entity.id(),
                format!("missing or mistyped attribute '{}'", attr),
            )
        };
        let user = entity
            .get(&CommonAttributes::USER_ID)
            .ok_or_else(|| missing(CommonAttributes::USER_ID.name()))?;
        let item = entity
            .get(&CommonAttributes::ITEM_ID)
            .ok_or_else(|| missing(CommonAttributes::ITEM_ID.name()))?;
        let value = entity
            .get(&CommonAttributes::RATING)
            .ok_or_else(|| missing(CommonAttributes::RATING.name()))?;
        Ok(Rating {
            id: entity.id(),
            user,
            item,
            value,
            timestamp: entity.get(&CommonAttributes::TIMESTAMP),
        })
    }
}
