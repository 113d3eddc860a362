//! Packed column storage for entity types with a declared layout
//!
//! Every declared attribute gets one typed column with a slot per row and a
//! presence bitmap marking the rows that carry it. Attributes the layout does
//! not declare are kept beside the columns, per row. Entities are rebuilt on
//! access, so readers see the same entities row storage would hand out.

use lensdb_core::{AttrValue, AttributeSet, Entity, EntityType, ValueType, ID_ATTRIBUTE};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

// ============================================================================
// Presence
// ============================================================================

/// One bit per row
#[derive(Debug, Clone, Default)]
struct Presence {
    words: Vec<u64>,
}

impl Presence {
    fn with_rows(rows: usize) -> Self {
        Presence {
            words: vec![0; (rows + 63) / 64],
        }
    }

    fn set(&mut self, row: usize) {
        self.words[row / 64] |= 1u64 << (row % 64);
    }

    fn get(&self, row: usize) -> bool {
        self.words
            .get(row / 64)
            .is_some_and(|word| word & (1u64 << (row % 64)) != 0)
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

// ============================================================================
// Column
// ============================================================================

/// Values of one declared attribute; absent rows hold a filler
#[derive(Debug)]
enum Column {
    Long(Vec<i64>),
    Double(Vec<f64>),
    Text(Vec<String>),
    Bool(Vec<bool>),
}

impl Column {
    fn with_capacity(value_type: ValueType, rows: usize) -> Self {
        match value_type {
            ValueType::Long => Column::Long(Vec::with_capacity(rows)),
            ValueType::Double => Column::Double(Vec::with_capacity(rows)),
            ValueType::Text => Column::Text(Vec::with_capacity(rows)),
            ValueType::Bool => Column::Bool(Vec::with_capacity(rows)),
        }
    }

    /// Append a slot; returns false (and stores a filler) unless the value
    /// is present with the column's type
    fn push(&mut self, value: Option<&AttrValue>) -> bool {
        match (self, value) {
            (Column::Long(v), Some(AttrValue::Long(x))) => v.push(*x),
            (Column::Double(v), Some(AttrValue::Double(x))) => v.push(*x),
            (Column::Text(v), Some(AttrValue::Text(x))) => v.push(x.clone()),
            (Column::Bool(v), Some(AttrValue::Bool(x))) => v.push(*x),
            (Column::Long(v), _) => {
                v.push(0);
                return false;
            }
            (Column::Double(v), _) => {
                v.push(0.0);
                return false;
            }
            (Column::Text(v), _) => {
                v.push(String::new());
                return false;
            }
            (Column::Bool(v), _) => {
                v.push(false);
                return false;
            }
        }
        true
    }

    fn value(&self, row: usize) -> AttrValue {
        match self {
            Column::Long(v) => AttrValue::Long(v[row]),
            Column::Double(v) => AttrValue::Double(v[row]),
            Column::Text(v) => AttrValue::Text(v[row].clone()),
            Column::Bool(v) => AttrValue::Bool(v[row]),
        }
    }

    /// Compare a slot against a value without materializing it
    ///
    /// Doubles compare with `total_cmp`, matching `AttrValue` equality.
    fn matches(&self, row: usize, value: &AttrValue) -> bool {
        match (self, value) {
            (Column::Long(v), AttrValue::Long(x)) => v[row] == *x,
            (Column::Double(v), AttrValue::Double(x)) => v[row].total_cmp(x).is_eq(),
            (Column::Text(v), AttrValue::Text(x)) => v[row] == *x,
            (Column::Bool(v), AttrValue::Bool(x)) => v[row] == *x,
            _ => false,
        }
    }
}

// ============================================================================
// PackedRows
// ============================================================================

/// Id-ordered rows stored column-wise
#[derive(Debug)]
pub(crate) struct PackedRows {
    entity_type: EntityType,
    layout: AttributeSet,
    ids: Vec<i64>,
    /// One column per layout position
    columns: Vec<(Column, Presence)>,
    /// Attributes outside the layout, by row
    extras: FxHashMap<usize, BTreeMap<String, AttrValue>>,
}

impl PackedRows {
    /// Pack id-ordered entities of one type
    ///
    /// A value whose type disagrees with its declared column is kept with
    /// the row's undeclared attributes rather than dropped.
    pub(crate) fn pack(entity_type: EntityType, layout: AttributeSet, entities: Vec<Entity>) -> Self {
        let rows = entities.len();
        let mut columns: Vec<(Column, Presence)> = layout
            .iter()
            .map(|name| {
                (
                    Column::with_capacity(name.value_type(), rows),
                    Presence::with_rows(rows),
                )
            })
            .collect();
        let mut ids = Vec::with_capacity(rows);
        let mut extras: FxHashMap<usize, BTreeMap<String, AttrValue>> = FxHashMap::default();

        for (row, entity) in entities.iter().enumerate() {
            ids.push(entity.id());
            for (name, (column, present)) in layout.iter().zip(columns.iter_mut()) {
                if column.push(entity.value(name.name())) {
                    present.set(row);
                }
            }
            for (name, value) in entity.attributes() {
                if name == ID_ATTRIBUTE {
                    continue;
                }
                let packed = layout
                    .position(name)
                    .is_some_and(|pos| columns[pos].1.get(row));
                if !packed {
                    extras
                        .entry(row)
                        .or_default()
                        .insert(name.to_string(), value.clone());
                }
            }
        }

        PackedRows {
            entity_type,
            layout,
            ids,
            columns,
            extras,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn id_at(&self, row: usize) -> i64 {
        self.ids[row]
    }

    pub(crate) fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Number of values held in columns rather than per row
    pub(crate) fn packed_values(&self) -> usize {
        self.columns.iter().map(|(_, present)| present.count()).sum()
    }

    fn column(&self, row: usize, name: &str) -> Option<&Column> {
        let (column, present) = &self.columns[self.layout.position(name)?];
        present.get(row).then_some(column)
    }

    fn extra(&self, row: usize, name: &str) -> Option<&AttrValue> {
        self.extras.get(&row)?.get(name)
    }

    /// Rebuild the entity stored at a row
    pub(crate) fn entity_at(&self, row: usize) -> Entity {
        let mut attributes: BTreeMap<String, AttrValue> = self
            .extras
            .get(&row)
            .cloned()
            .unwrap_or_default();
        for (name, (column, present)) in self.layout.iter().zip(&self.columns) {
            if present.get(row) {
                attributes.insert(name.name().to_string(), column.value(row));
            }
        }
        Entity::from_parts(self.entity_type.clone(), self.ids[row], attributes)
    }

    /// The value of one attribute at a row
    pub(crate) fn value_at(&self, row: usize, name: &str) -> Option<AttrValue> {
        if name == ID_ATTRIBUTE {
            return Some(AttrValue::Long(self.ids[row]));
        }
        match self.column(row, name) {
            Some(column) => Some(column.value(row)),
            None => self.extra(row, name).cloned(),
        }
    }

    /// Does the row carry attribute `name` with an equal value?
    pub(crate) fn matches_at(&self, row: usize, name: &str, value: &AttrValue) -> bool {
        if name == ID_ATTRIBUTE {
            return value.as_long() == Some(self.ids[row]);
        }
        match self.column(row, name) {
            Some(column) => column.matches(row, value),
            None => self.extra(row, name) == Some(value),
        }
    }
}
