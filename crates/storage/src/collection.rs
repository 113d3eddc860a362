//! Immutable entity collections
//!
//! An `EntityCollection` owns every entity of one type. Entities are stored
//! in ascending id order, which is the collection's natural iteration order
//! and is declared through [`EntityCollection::sort_keys`].
//!
//! Storage is either row-wise (shared `Entity` handles) or, for types with a
//! declared layout, packed into typed columns with a presence bitmap. Both
//! hand out equal entities in the same order.
//!
//! Lookup paths:
//! - primary id index: `lookup`, `contains`, `id_set`
//! - secondary attribute indices (requested at build time): `find`
//! - full scan: `find` on an unindexed attribute, `iter`
//!
//! Indices are a performance optimization only: `find` returns the same
//! entities, in the same order, whether or not the attribute is indexed.

use crate::index::AttrIndex;
use crate::packed::PackedRows;
use lensdb_core::{
    AttrType, AttrValue, Attribute, AttributeSet, CommonAttributes, Entity, EntityType, SortKey,
    TypedName, ID_ATTRIBUTE,
};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

/// Entity storage, by row position
enum Rows {
    Plain(Vec<Entity>),
    Packed(PackedRows),
}

impl Rows {
    fn len(&self) -> usize {
        match self {
            Rows::Plain(entities) => entities.len(),
            Rows::Packed(packed) => packed.len(),
        }
    }

    fn id_at(&self, pos: usize) -> i64 {
        match self {
            Rows::Plain(entities) => entities[pos].id(),
            Rows::Packed(packed) => packed.id_at(pos),
        }
    }

    fn entity_at(&self, pos: usize) -> Entity {
        match self {
            Rows::Plain(entities) => entities[pos].clone(),
            Rows::Packed(packed) => packed.entity_at(pos),
        }
    }

    fn value_at(&self, pos: usize, name: &str) -> Option<AttrValue> {
        match self {
            Rows::Plain(entities) => entities[pos].value(name).cloned(),
            Rows::Packed(packed) => packed.value_at(pos, name),
        }
    }

    fn matches_at(&self, pos: usize, name: &str, value: &AttrValue) -> bool {
        match self {
            Rows::Plain(entities) => entities[pos].value(name) == Some(value),
            Rows::Packed(packed) => packed.matches_at(pos, name, value),
        }
    }
}

/// Immutable, indexed store of all entities of one type
pub struct EntityCollection {
    entity_type: EntityType,
    /// Entities in ascending id order
    rows: Rows,
    /// Primary index: id → position
    id_index: FxHashMap<i64, usize>,
    /// Secondary indices by attribute name
    indexes: FxHashMap<String, AttrIndex>,
    /// Orderings the natural iteration order satisfies
    sort_keys: Vec<SortKey>,
}

impl EntityCollection {
    /// Assemble a collection from id-ordered entities
    ///
    /// With a layout, entities are packed column-wise.
    pub(crate) fn from_sorted<'a>(
        entity_type: EntityType,
        entities: Vec<Entity>,
        layout: Option<AttributeSet>,
        index_names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        debug_assert!(entities.windows(2).all(|w| w[0].id() < w[1].id()));
        let rows = match layout {
            Some(layout) => Rows::Packed(PackedRows::pack(entity_type.clone(), layout, entities)),
            None => Rows::Plain(entities),
        };
        let id_index = (0..rows.len()).map(|pos| (rows.id_at(pos), pos)).collect();
        let indexes = index_names
            .into_iter()
            .filter(|name| *name != ID_ATTRIBUTE)
            .map(|name| {
                let values = (0..rows.len()).map(|pos| rows.value_at(pos, name));
                (name.to_string(), AttrIndex::from_column(name, values))
            })
            .collect();
        EntityCollection {
            entity_type,
            rows,
            id_index,
            indexes,
            sort_keys: vec![SortKey::ascending(&CommonAttributes::ENTITY_ID)],
        }
    }

    /// Create an empty collection
    pub fn empty(entity_type: EntityType) -> Self {
        Self::from_sorted(entity_type, Vec::new(), None, std::iter::empty())
    }

    /// The type of every entity in this collection
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Is the collection empty?
    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }

    /// Are entities stored in packed columns?
    pub fn is_packed(&self) -> bool {
        matches!(self.rows, Rows::Packed(_))
    }

    /// Number of attribute values held in packed columns (0 for row storage)
    pub fn packed_values(&self) -> usize {
        match &self.rows {
            Rows::Plain(_) => 0,
            Rows::Packed(packed) => packed.packed_values(),
        }
    }

    /// Iterate entities in natural (ascending id) order
    pub fn iter(&self) -> Entities<'_> {
        Entities {
            rows: &self.rows,
            positions: 0..self.rows.len(),
        }
    }

    /// Look up an entity by id
    pub fn lookup(&self, id: i64) -> Option<Entity> {
        self.id_index.get(&id).map(|pos| self.rows.entity_at(*pos))
    }

    /// Is there an entity with this id?
    pub fn contains(&self, id: i64) -> bool {
        self.id_index.contains_key(&id)
    }

    /// The set of entity ids
    pub fn id_set(&self) -> BTreeSet<i64> {
        match &self.rows {
            Rows::Plain(entities) => entities.iter().map(Entity::id).collect(),
            Rows::Packed(packed) => packed.ids().iter().copied().collect(),
        }
    }

    /// The orderings the natural iteration order is guaranteed to satisfy
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    /// Is there a secondary index on this attribute?
    ///
    /// The `id` attribute is always served by the primary index.
    pub fn has_index(&self, attribute: &str) -> bool {
        attribute == ID_ATTRIBUTE || self.indexes.contains_key(attribute)
    }

    /// Names of the attributes with secondary indices
    pub fn indexed_attributes(&self) -> BTreeSet<&str> {
        self.indexes.keys().map(String::as_str).collect()
    }

    /// Find the entities satisfying an equality condition
    pub fn find(&self, condition: &Attribute) -> Candidates<'_> {
        self.find_value(condition.name().name(), condition.value())
    }

    /// Find the entities whose attribute `name` equals `value`
    pub fn find_value(&self, name: &str, value: &AttrValue) -> Candidates<'_> {
        if name == ID_ATTRIBUTE {
            let found = value
                .as_long()
                .and_then(|id| self.id_index.get(&id))
                .map(|pos| self.rows.entity_at(*pos));
            return Candidates {
                inner: CandidatesInner::Single(found),
            };
        }
        match self.indexes.get(name) {
            Some(index) => Candidates {
                inner: CandidatesInner::Indexed {
                    rows: &self.rows,
                    positions: index.positions(value).iter(),
                },
            },
            None => Candidates {
                inner: CandidatesInner::Scan {
                    rows: &self.rows,
                    positions: 0..self.rows.len(),
                    name: name.to_string(),
                    value: value.clone(),
                },
            },
        }
    }

    /// Find the entities whose typed attribute equals `value`
    pub fn find_typed<T: AttrType>(&self, name: &TypedName<T>, value: T) -> Candidates<'_> {
        self.find_value(name.name(), &value.into_value())
    }

    /// Partition entities by the value of a long-valued attribute
    ///
    /// Entities keep their natural order within each group. Entities lacking
    /// the attribute belong to no group.
    pub fn grouped(&self, attribute: &TypedName<i64>) -> BTreeMap<i64, Vec<Entity>> {
        let mut groups: BTreeMap<i64, Vec<Entity>> = BTreeMap::new();
        if let Some(index) = self.indexes.get(attribute.name()) {
            for (value, positions) in index.entries() {
                if let Some(key) = value.as_long() {
                    groups.insert(
                        key,
                        positions.iter().map(|p| self.rows.entity_at(*p)).collect(),
                    );
                }
            }
        } else {
            for pos in 0..self.rows.len() {
                let key = self
                    .rows
                    .value_at(pos, attribute.name())
                    .and_then(|v| v.as_long());
                if let Some(key) = key {
                    groups.entry(key).or_default().push(self.rows.entity_at(pos));
                }
            }
        }
        groups
    }
}

impl fmt::Debug for EntityCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCollection")
            .field("type", &self.entity_type.name())
            .field("entities", &self.rows.len())
            .field("packed", &self.is_packed())
            .field("indexes", &self.indexed_attributes())
            .finish()
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = Entity;
    type IntoIter = Entities<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a collection's entities in natural order
pub struct Entities<'a> {
    rows: &'a Rows,
    positions: Range<usize>,
}

impl Iterator for Entities<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.positions.next().map(|pos| self.rows.entity_at(pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl DoubleEndedIterator for Entities<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.positions.next_back().map(|pos| self.rows.entity_at(pos))
    }
}

impl ExactSizeIterator for Entities<'_> {}

// ============================================================================
// Candidates
// ============================================================================

/// Lazy iterator over the entities matching a `find` condition
///
/// Yields entities in natural order regardless of the access path.
pub struct Candidates<'a> {
    inner: CandidatesInner<'a>,
}

enum CandidatesInner<'a> {
    Single(Option<Entity>),
    Indexed {
        rows: &'a Rows,
        positions: std::slice::Iter<'a, usize>,
    },
    Scan {
        rows: &'a Rows,
        positions: Range<usize>,
        name: String,
        value: AttrValue,
    },
}

impl Candidates<'_> {
    /// Were these candidates produced by an index probe (rather than a scan)?
    pub fn is_indexed(&self) -> bool {
        !matches!(self.inner, CandidatesInner::Scan { .. })
    }
}

impl Iterator for Candidates<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            CandidatesInner::Single(found) => found.take(),
            CandidatesInner::Indexed { rows, positions } => {
                positions.next().map(|pos| rows.entity_at(*pos))
            }
            CandidatesInner::Scan {
                rows,
                positions,
                name,
                value,
            } => {
                let rows: &Rows = rows;
                let (name, value) = (name.as_str(), &*value);
                positions
                    .find(|pos| rows.matches_at(*pos, name, value))
                    .map(|pos| rows.entity_at(pos))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            CandidatesInner::Single(found) => {
                let n = usize::from(found.is_some());
                (n, Some(n))
            }
            CandidatesInner::Indexed { positions, .. } => positions.size_hint(),
            CandidatesInner::Scan { positions, .. } => (0, positions.size_hint().1),
        }
    }
}
