//! Secondary attribute indices
//!
//! An `AttrIndex` maps each value of one attribute to the positions (in the
//! collection's natural order) of the entities holding that value. Positions
//! within a posting list are ascending, so probing an index yields entities
//! in the same order a full scan would.

use lensdb_core::{AttrValue, Entity};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Positions of the entities holding one value
///
/// Most values in rating data are held by a handful of entities; keep
/// short posting lists inline.
pub type Postings = SmallVec<[usize; 4]>;

/// Secondary index: attribute value → entity positions
#[derive(Debug, Default)]
pub struct AttrIndex {
    attribute: String,
    postings: FxHashMap<AttrValue, Postings>,
}

impl AttrIndex {
    /// Build an index over `attribute` for entities stored in natural order
    ///
    /// Entities lacking the attribute are not indexed.
    pub fn build(attribute: &str, entities: &[Entity]) -> Self {
        Self::from_column(attribute, entities.iter().map(|e| e.value(attribute).cloned()))
    }

    /// Build an index from one attribute's values, given by position
    ///
    /// `None` marks a position lacking the attribute.
    pub fn from_column(attribute: &str, values: impl IntoIterator<Item = Option<AttrValue>>) -> Self {
        let mut postings: FxHashMap<AttrValue, Postings> = FxHashMap::default();
        for (pos, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                postings.entry(value).or_default().push(pos);
            }
        }
        AttrIndex {
            attribute: attribute.to_string(),
            postings,
        }
    }

    /// The indexed attribute
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Positions of the entities holding `value` (ascending)
    pub fn positions(&self, value: &AttrValue) -> &[usize] {
        self.postings
            .get(value)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate (value, positions) pairs in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = (&AttrValue, &[usize])> {
        self.postings.iter().map(|(v, p)| (v, p.as_slice()))
    }

    /// Number of distinct indexed values
    pub fn value_count(&self) -> usize {
        self.postings.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
