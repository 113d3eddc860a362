//! Default characteristics of the common entity types
//!
//! Each common type has a set of well-known attributes (usable as a storage
//! layout) and a list of default derivations: entity types whose bare
//! entities can be synthesized from attribute values of this type. Ratings,
//! for example, imply the existence of the users and items they reference.

use crate::attribute::{AttrName, AttributeSet, TypedName};
use crate::common::{CommonAttributes, CommonTypes};
use crate::types::EntityType;

/// A derivation of bare entities of one type from attribute values of another
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDerivation {
    derived_type: EntityType,
    source_type: EntityType,
    attribute: TypedName<i64>,
}

impl EntityDerivation {
    /// Derive `derived_type` entities from the `attribute` values of `source_type` entities
    pub fn new(derived_type: EntityType, source_type: EntityType, attribute: TypedName<i64>) -> Self {
        EntityDerivation {
            derived_type,
            source_type,
            attribute,
        }
    }

    /// The type of the synthesized entities
    pub fn derived_type(&self) -> &EntityType {
        &self.derived_type
    }

    /// The type whose attribute values are read
    pub fn source_type(&self) -> &EntityType {
        &self.source_type
    }

    /// The attribute holding the derived ids
    pub fn attribute(&self) -> &TypedName<i64> {
        &self.attribute
    }
}

/// Defaults for an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefaults {
    entity_type: EntityType,
    attributes: AttributeSet,
    derivations: Vec<EntityDerivation>,
}

impl EntityDefaults {
    /// Create defaults with the given well-known attributes
    pub fn new(entity_type: EntityType, attributes: AttributeSet) -> Self {
        EntityDefaults {
            entity_type,
            attributes,
            derivations: Vec::new(),
        }
    }

    /// Add a default derivation sourced from this type
    pub fn with_derivation(mut self, derived_type: EntityType, attribute: TypedName<i64>) -> Self {
        let source = self.entity_type.clone();
        self.derivations
            .push(EntityDerivation::new(derived_type, source, attribute));
        self
    }

    /// Look up the built-in defaults for an entity type
    pub fn lookup(entity_type: &EntityType) -> Option<EntityDefaults> {
        let id = CommonAttributes::ENTITY_ID.erase();
        match entity_type.name() {
            "user" | "item" => Some(EntityDefaults::new(
                entity_type.clone(),
                AttributeSet::new([id, CommonAttributes::NAME.erase()]),
            )),
            "rating" => Some(
                EntityDefaults::new(
                    entity_type.clone(),
                    AttributeSet::new([
                        id,
                        CommonAttributes::USER_ID.erase(),
                        CommonAttributes::ITEM_ID.erase(),
                        CommonAttributes::RATING.erase(),
                        CommonAttributes::TIMESTAMP.erase(),
                    ]),
                )
                .with_derivation(CommonTypes::user(), CommonAttributes::USER_ID)
                .with_derivation(CommonTypes::item(), CommonAttributes::ITEM_ID),
            ),
            _ => None,
        }
    }

    /// The described entity type
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// The well-known attribute for a name, if any
    pub fn attribute(&self, name: &str) -> Option<&AttrName> {
        self.attributes.lookup(name)
    }

    /// All well-known attributes
    pub fn common_attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Default derivations sourced from this type
    pub fn derivations(&self) -> &[EntityDerivation] {
        &self.derivations
    }
}
