//! Two ratings by the same user, queried every way

use crate::common::*;
use lensdb::EntityStoreBuilder;

fn two_ratings() -> Vec<Entity> {
    vec![
        Rating::new(1, 10, 100, 4.0).to_entity(),
        Rating::new(2, 10, 200, 2.0).to_entity(),
    ]
}

fn user10_by_value_desc() -> EntityQuery {
    EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::USER_ID, 10)
        .add_sort_key(SortKey::descending(&CommonAttributes::RATING))
        .build()
}

fn indexed_dao() -> EntityCollectionDao {
    let mut builder = EntityStoreBuilder::new();
    builder
        .add_index(&CommonTypes::rating(), "user")
        .unwrap()
        .add_entities(two_ratings().into_iter().rev())
        .unwrap();
    EntityCollectionDao::new(builder.build().unwrap())
}

// ============================================================================
// Filter + sort
// ============================================================================

#[test]
fn test_filter_and_sort_over_scan() {
    let dao = EntityCollectionDao::from_entities(two_ratings()).unwrap();
    let query = user10_by_value_desc();
    assert_eq!(dao.plan(&query).explain(), "filtered-scan(rating.user) -> sort");
    assert_eq!(ids(dao.stream_entities(&query).unwrap()), vec![1, 2]);
}

#[test]
fn test_filter_and_sort_over_index() {
    let dao = indexed_dao();
    let query = user10_by_value_desc();
    assert_eq!(dao.plan(&query).explain(), "index-probe(rating.user) -> sort");
    assert_eq!(ids(dao.stream_entities(&query).unwrap()), vec![1, 2]);
}

#[test]
fn test_filter_and_sort_over_reference_backend() {
    let access = SortingVecAccess {
        entities: two_ratings().into_iter().rev().collect(),
    };
    assert_eq!(ids(access.stream_entities(&user10_by_value_desc()).unwrap()), vec![1, 2]);
}

#[test]
fn test_filter_and_sort_fluent() {
    let dao = EntityCollectionDao::from_entities(two_ratings()).unwrap();
    let ratings = dao
        .query_view::<Rating>()
        .unwrap()
        .with_attribute(&CommonAttributes::USER_ID, 10)
        .order_by_with(&CommonAttributes::RATING, SortOrder::Descending)
        .get()
        .unwrap();
    assert_eq!(
        ratings,
        vec![Rating::new(1, 10, 100, 4.0), Rating::new(2, 10, 200, 2.0)]
    );
}

#[test]
fn test_ascending_reverses() {
    let dao = indexed_dao();
    let query = EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::USER_ID, 10)
        .add_sort_key(SortKey::ascending(&CommonAttributes::RATING))
        .build();
    assert_eq!(ids(dao.stream_entities(&query).unwrap()), vec![2, 1]);
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_group_by_user_native() {
    let dao = EntityCollectionDao::from_entities(two_ratings()).unwrap();
    let query = EntityQueryBuilder::new(CommonTypes::rating()).build();
    let groups = dao
        .stream_entity_groups(&query, &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(group_ids(groups), vec![(10, vec![1, 2])]);
}

#[test]
fn test_group_by_user_indexed() {
    let dao = indexed_dao();
    let query = EntityQueryBuilder::new(CommonTypes::rating()).build();
    let groups = dao
        .stream_entity_groups(&query, &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(group_ids(groups), vec![(10, vec![1, 2])]);
}

#[test]
fn test_group_by_user_default() {
    let access = SortingVecAccess {
        entities: two_ratings(),
    };
    let query = EntityQueryBuilder::new(CommonTypes::rating()).build();
    let groups = access
        .stream_entity_groups(&query, &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(group_ids(groups), vec![(10, vec![1, 2])]);
}

#[test]
fn test_group_by_user_projected() {
    let dao = EntityCollectionDao::from_entities(two_ratings()).unwrap();
    let groups = dao
        .query_view::<Rating>()
        .unwrap()
        .group_by(&CommonAttributes::USER_ID)
        .get()
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id(), 10);
    let values: Vec<f64> = groups[0].value().iter().map(|r| r.value).collect();
    assert_eq!(values, vec![4.0, 2.0]);
}
