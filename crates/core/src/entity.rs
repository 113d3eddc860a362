//! Entities: typed, identified, attribute-bearing records
//!
//! An entity is identified by `(entity type, id)` and carries an ordered set
//! of attribute values keyed by name. The id is itself exposed as the `id`
//! attribute so it can be filtered and sorted like any other attribute.
//!
//! Entities are immutable; cloning one shares its attribute storage.

use crate::attribute::{AttrType, Attribute, TypedName};
use crate::error::{Error, Result};
use crate::types::EntityType;
use crate::value::{AttrValue, ValueType};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of the attribute holding the entity id
pub const ID_ATTRIBUTE: &str = "id";

#[derive(PartialEq)]
struct EntityData {
    entity_type: EntityType,
    id: i64,
    attributes: BTreeMap<String, AttrValue>,
}

/// An immutable entity
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityData>,
}

impl Entity {
    /// Create a bare entity (id only)
    pub fn bare(entity_type: EntityType, id: i64) -> Self {
        EntityBuilder::new(entity_type, id).build()
    }

    /// Assemble an entity from its attribute map
    ///
    /// Any `id` entry in `attributes` is replaced by `id`.
    pub fn from_parts(
        entity_type: EntityType,
        id: i64,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Self {
        EntityBuilder {
            entity_type,
            id,
            attributes,
        }
        .build()
    }

    /// Start building an entity
    pub fn builder(entity_type: EntityType, id: i64) -> EntityBuilder {
        EntityBuilder::new(entity_type, id)
    }

    /// Start a builder pre-populated with this entity's attributes
    pub fn copy_builder(&self) -> EntityBuilder {
        EntityBuilder {
            entity_type: self.inner.entity_type.clone(),
            id: self.inner.id,
            attributes: self.inner.attributes.clone(),
        }
    }

    /// The entity type
    pub fn entity_type(&self) -> &EntityType {
        &self.inner.entity_type
    }

    /// The entity id
    pub fn id(&self) -> i64 {
        self.inner.id
    }

    /// Read a typed attribute
    ///
    /// Returns None if the attribute is absent or holds a value of another type.
    pub fn get<T: AttrType>(&self, name: &TypedName<T>) -> Option<T> {
        self.inner.attributes.get(name.name()).and_then(T::from_value)
    }

    /// Read an attribute value by name
    pub fn value(&self, name: &str) -> Option<&AttrValue> {
        self.inner.attributes.get(name)
    }

    /// Does the entity carry an attribute with this name?
    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.contains_key(name)
    }

    /// Does the entity carry this attribute with an equal value?
    ///
    /// A missing attribute never matches.
    pub fn satisfies(&self, attribute: &Attribute) -> bool {
        self.value(attribute.name().name()) == Some(attribute.value())
    }

    /// Iterate attributes in name order (including `id`)
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.inner
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of attributes (including `id`)
    pub fn attribute_count(&self) -> usize {
        self.inner.attributes.len()
    }

    /// Is this a bare entity (no attributes besides the id)?
    pub fn is_bare(&self) -> bool {
        self.inner.attributes.len() == 1
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        map.entry(&"type", &self.inner.entity_type.name());
        for (name, value) in &self.inner.attributes {
            map.entry(name, value);
        }
        map.finish()
    }
}

// ============================================================================
// EntityBuilder
// ============================================================================

/// Builder for entities
///
/// ```ignore
/// let rating = Entity::builder(CommonTypes::rating(), 1)
///     .set(&CommonAttributes::USER_ID, 10)
///     .set(&CommonAttributes::ITEM_ID, 100)
///     .set(&CommonAttributes::RATING, 4.0)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    entity_type: EntityType,
    id: i64,
    attributes: BTreeMap<String, AttrValue>,
}

impl EntityBuilder {
    /// Create a builder for an entity of the given type and id
    pub fn new(entity_type: EntityType, id: i64) -> Self {
        EntityBuilder {
            entity_type,
            id,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the entity id
    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Set a typed attribute
    ///
    /// Setting the `id` attribute changes the entity id.
    ///
    /// # Panics
    ///
    /// Panics if `name` is `id` with a value type other than Long. Use
    /// [`EntityBuilder::set_value`] to get this as an error instead.
    pub fn set<T: AttrType>(mut self, name: &TypedName<T>, value: T) -> Self {
        let value = value.into_value();
        if name.name() == ID_ATTRIBUTE {
            assert!(
                T::VALUE_TYPE == ValueType::Long,
                "id attribute requires a Long value, got {}",
                T::VALUE_TYPE
            );
            if let AttrValue::Long(id) = value {
                self.id = id;
            }
            return self;
        }
        self.attributes.insert(name.name().to_string(), value);
        self
    }

    /// Set an attribute from a dynamically typed value
    ///
    /// Fails if the attribute is `id` and the value is not a Long.
    pub fn set_value(mut self, name: &str, value: AttrValue) -> Result<Self> {
        if name == ID_ATTRIBUTE {
            return match value {
                AttrValue::Long(id) => {
                    self.id = id;
                    Ok(self)
                }
                other => Err(Error::AttributeType {
                    name: ID_ATTRIBUTE.to_string(),
                    expected: ValueType::Long,
                    actual: other.value_type(),
                }),
            };
        }
        self.attributes.insert(name.to_string(), value);
        Ok(self)
    }

    /// Remove an attribute
    pub fn clear(mut self, name: &str) -> Self {
        self.attributes.remove(name);
        self
    }

    /// Build the entity
    pub fn build(mut self) -> Entity {
        self.attributes
            .insert(ID_ATTRIBUTE.to_string(), AttrValue::Long(self.id));
        Entity {
            inner: Arc::new(EntityData {
                entity_type: self.entity_type,
                id: self.id,
                attributes: self.attributes,
            }),
        }
    }
}
