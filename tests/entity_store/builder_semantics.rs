//! Store builder semantics

use crate::common::*;
use lensdb::{AttrName, AttributeSet, EntityStoreBuilder, ValueType};

// ============================================================================
// Last write wins
// ============================================================================

#[test]
fn test_last_write_wins_for_repeated_ids() {
    let mut builder = EntityStoreBuilder::new();
    builder
        .add_entity(Rating::new(1, 10, 100, 4.0).to_entity())
        .unwrap()
        .add_entity(Rating::new(2, 10, 101, 2.0).to_entity())
        .unwrap()
        .add_entity(Rating::new(1, 10, 100, 1.5).to_entity())
        .unwrap();
    let dao = EntityCollectionDao::new(builder.build().unwrap());

    assert_eq!(dao.entity_ids(&CommonTypes::rating()).len(), 2);
    let replaced: Option<Rating> = dao.lookup_as(&CommonTypes::rating(), 1).unwrap();
    assert_eq!(replaced.map(|r| r.value), Some(1.5));
}

#[test]
fn test_repeated_id_streams_once() {
    let mut entities = rating_entities();
    entities.push(Rating::new(1, 10, 100, 1.0).to_entity());
    let dao = EntityCollectionDao::from_entities(entities).unwrap();
    assert_eq!(ids(dao.stream_all(&CommonTypes::rating()).unwrap()), vec![1, 2, 3]);
}

// ============================================================================
// Single use
// ============================================================================

#[test]
fn test_store_builder_single_use() {
    let mut builder = EntityStoreBuilder::new();
    builder.add_entities(rating_entities()).unwrap();
    let store = builder.build().unwrap();
    assert_eq!(store.entity_count(), 3);

    let again = builder.build();
    assert!(matches!(again, Err(Error::BuilderConsumed)));
    assert!(again.unwrap_err().is_programming());
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn test_layout_rejects_mistyped_attribute() {
    let layout = AttributeSet::new([
        CommonAttributes::USER_ID.erase(),
        AttrName::new("rating", ValueType::Double),
    ]);
    let mut builder = EntityStoreBuilder::new();
    builder.set_layout(&CommonTypes::rating(), layout).unwrap();

    let wrong = Entity::builder(CommonTypes::rating(), 1)
        .set(&TypedName::<i64>::of("rating"), 4)
        .build();
    let err = builder.add_entity(wrong).unwrap_err();
    assert!(matches!(
        err,
        Error::AttributeType { expected: ValueType::Double, actual: ValueType::Long, .. }
    ));
    assert!(builder.add_entities(rating_entities()).is_ok());
}

#[test]
fn test_layout_after_entities_conflicts() {
    let mut builder = EntityStoreBuilder::new();
    builder.add_entities(rating_entities()).unwrap();
    let err = builder
        .set_layout(&CommonTypes::rating(), AttributeSet::default())
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, Error::LayoutConflict { .. }));
}

// ============================================================================
// Indices
// ============================================================================

#[test]
fn test_index_after_entities_serves_queries() {
    let mut builder = EntityStoreBuilder::new();
    builder.add_entities(rating_entities()).unwrap();
    builder.add_index(&CommonTypes::rating(), "item").unwrap();
    let dao = EntityCollectionDao::new(builder.build().unwrap());

    let query = EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::ITEM_ID, 100)
        .build();
    assert_eq!(dao.plan(&query).explain(), "index-probe(rating.item)");
    assert_eq!(ids(dao.stream_entities(&query).unwrap()), vec![1, 3]);
}
