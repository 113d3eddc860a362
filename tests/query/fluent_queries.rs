//! Fluent query surface

use crate::common::*;
use lensdb::AttrValue;

/// A view nothing maps to
#[derive(Debug)]
struct Playlist;

impl lensdb::EntityView for Playlist {
    const VIEW_NAME: &'static str = "Playlist";

    fn project(_: &Entity) -> Result<Self> {
        Ok(Playlist)
    }
}

fn rating_ids(ratings: &[Rating]) -> Vec<i64> {
    ratings.iter().map(|r| r.id).collect()
}

// ============================================================================
// Refinement
// ============================================================================

#[test]
fn test_refinement_leaves_receiver_untouched() {
    let dao = fixture_dao();
    let base = dao.query(&CommonTypes::rating());
    let by_user = base.with_attribute(&CommonAttributes::USER_ID, 10);
    let by_user_item = by_user.with_attribute(&CommonAttributes::ITEM_ID, 101);

    assert_eq!(base.count().unwrap(), 3);
    assert_eq!(by_user.count().unwrap(), 2);
    assert_eq!(by_user_item.count().unwrap(), 1);
    assert!(base.spec().filters().is_empty());
}

#[test]
fn test_with_value_filters_dynamically() {
    let dao = fixture_dao();
    let found = dao
        .query(&CommonTypes::rating())
        .with_value("user", AttrValue::from(20i64))
        .get()
        .unwrap();
    assert_eq!(found.iter().map(Entity::id).collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_compound_order() {
    let dao = fixture_dao();
    let ratings = dao
        .query_view::<Rating>()
        .unwrap()
        .order_by_with(&CommonAttributes::USER_ID, SortOrder::Descending)
        .order_by(&CommonAttributes::RATING)
        .get()
        .unwrap();
    assert_eq!(rating_ids(&ratings), vec![3, 2, 1]);
}

#[test]
fn test_custom_comparator_order() {
    let dao = fixture_dao();
    let odd_items_first = SortKey::ascending(&CommonAttributes::ITEM_ID).with_comparator(|a, b| {
        let parity = |v: &AttrValue| v.as_long().map(|n| n % 2 == 0);
        parity(a).cmp(&parity(b))
    });
    let query = dao.query(&CommonTypes::rating()).order_by_key(odd_items_first);

    let plan = dao.plan(&query.spec());
    assert!(plan.requires_sort());
    let ids: Vec<i64> = query.get().unwrap().iter().map(Entity::id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn test_spec_renders_query() {
    let dao = fixture_dao();
    let query = dao
        .query_view::<Rating>()
        .unwrap()
        .with_attribute(&CommonAttributes::USER_ID, 10)
        .order_by_with(&CommonAttributes::RATING, SortOrder::Descending);
    assert_eq!(
        query.spec().to_string(),
        "rating where user = 10 order by rating desc"
    );
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_as_type_projects() {
    let dao = fixture_dao();
    let ratings = dao
        .query(&CommonTypes::rating())
        .with_attribute(&CommonAttributes::ITEM_ID, 100)
        .as_type::<Rating>()
        .get()
        .unwrap();
    assert_eq!(rating_ids(&ratings), vec![1, 3]);
    assert_eq!(ratings[1], Rating::new(3, 20, 100, 5.0));
}

#[test]
fn test_unmapped_view_is_configuration_error() {
    let dao = fixture_dao();
    let err = dao.query_view::<Playlist>().unwrap_err();
    assert!(matches!(err, Error::NoViewMapping { view: "Playlist" }));
    assert!(err.is_configuration());
}

#[test]
fn test_registered_view_resolves() {
    let mut builder = EntityCollectionDao::builder();
    builder
        .register_view::<Playlist>(CommonTypes::rating())
        .add_entities(rating_entities())
        .unwrap();
    let dao = builder.build().unwrap();
    assert_eq!(dao.query_view::<Playlist>().unwrap().get().unwrap().len(), 3);
}

#[test]
fn test_projection_failure_reported_per_item() {
    let dao = configured_dao(StoreConfig::default());
    let users = dao.query(&CommonTypes::user()).as_type::<Rating>();

    let err = users.get().unwrap_err();
    assert!(matches!(err, Error::Projection { view: "Rating", id: 10, .. }));

    let items: Vec<Result<Rating>> = users.stream().unwrap().collect();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|r| r.is_err()));

    // counting does not project
    assert_eq!(users.count().unwrap(), 2);
}

// ============================================================================
// Terminals
// ============================================================================

#[test]
fn test_value_set() {
    let dao = fixture_dao();
    let ratings = dao.query(&CommonTypes::rating());

    assert_eq!(
        ratings.value_set(&CommonAttributes::USER_ID).unwrap(),
        vec![10, 20]
    );
    assert_eq!(
        ratings
            .with_attribute(&CommonAttributes::USER_ID, 10)
            .value_set(&CommonAttributes::ITEM_ID)
            .unwrap(),
        vec![100, 101]
    );
    assert!(ratings.value_set(&CommonAttributes::NAME).unwrap().is_empty());
}

#[test]
fn test_value_set_of_doubles() {
    let dao = fixture_dao();
    let ratings = dao.query(&CommonTypes::rating());

    assert_eq!(
        ratings.value_set(&CommonAttributes::RATING).unwrap(),
        vec![3.5, 4.0, 5.0]
    );
    assert_eq!(
        ratings
            .with_attribute(&CommonAttributes::ITEM_ID, 100)
            .value_set(&CommonAttributes::RATING)
            .unwrap(),
        vec![4.0, 5.0]
    );
}

#[test]
fn test_value_set_dedupes() {
    let mut entities = rating_entities();
    entities.push(Rating::new(4, 30, 102, 4.0).to_entity());
    let dao = EntityCollectionDao::from_entities(entities).unwrap();
    let ratings = dao.query(&CommonTypes::rating());

    assert_eq!(
        ratings.value_set(&CommonAttributes::RATING).unwrap(),
        vec![3.5, 4.0, 5.0]
    );
    // a double-typed name over a long attribute matches nothing
    let user_as_double: TypedName<f64> = TypedName::of("user");
    assert!(ratings.value_set(&user_as_double).unwrap().is_empty());
}

#[test]
fn test_unknown_type_is_empty() {
    let dao = fixture_dao();
    let tags = dao.query(&EntityType::new("tag"));
    assert!(tags.get().unwrap().is_empty());
    assert_eq!(tags.count().unwrap(), 0);
    assert_eq!(dao.plan(&tags.spec()).explain(), "empty(tag)");
}

#[test]
fn test_stream_close_releases() {
    let dao = fixture_dao();
    let mut stream = dao.query(&CommonTypes::rating()).stream().unwrap();
    assert_eq!(stream.next().unwrap().unwrap().id(), 1);

    stream.close();
    assert!(stream.is_closed());
    assert!(stream.next().is_none());
}

#[test]
fn test_queries_through_trait_object() {
    let dao = fixture_dao();
    let access: &dyn DataAccess = &dao;

    let ratings = access
        .query_view::<Rating>()
        .unwrap()
        .with_attribute(&CommonAttributes::USER_ID, 10)
        .get()
        .unwrap();
    assert_eq!(rating_ids(&ratings), vec![1, 2]);
    assert_eq!(
        access
            .query_groups(&CommonTypes::rating(), &CommonAttributes::ITEM_ID)
            .count()
            .unwrap(),
        2
    );
}
