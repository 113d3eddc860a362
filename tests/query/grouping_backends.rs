//! Native grouping vs. the generic default

use crate::common::*;

fn all_ratings() -> EntityQuery {
    EntityQueryBuilder::new(CommonTypes::rating()).build()
}

fn ratings_by(key: SortKey) -> EntityQuery {
    EntityQueryBuilder::new(CommonTypes::rating())
        .add_sort_key(key)
        .build()
}

// ============================================================================
// Agreement
// ============================================================================

#[test]
fn test_native_and_default_agree() {
    let dao = fixture_dao();
    let sorting = SortingVecAccess {
        entities: rating_entities(),
    };
    let expected = vec![(10, vec![1, 2]), (20, vec![3])];

    for query in [
        all_ratings(),
        ratings_by(SortKey::descending(&CommonAttributes::RATING)),
    ] {
        let native = dao
            .stream_entity_groups(&query, &CommonAttributes::USER_ID)
            .unwrap();
        let default = sorting
            .stream_entity_groups(&query, &CommonAttributes::USER_ID)
            .unwrap();
        assert_eq!(group_ids(native), expected);
        assert_eq!(group_ids(default), expected);
    }
}

#[test]
fn test_groups_follow_query_order() {
    let dao = fixture_dao();
    let sorting = SortingVecAccess {
        entities: rating_entities(),
    };
    let query = ratings_by(SortKey::ascending(&CommonAttributes::RATING));
    let expected = vec![(10, vec![2, 1]), (20, vec![3])];

    assert_eq!(
        group_ids(dao.stream_entity_groups(&query, &CommonAttributes::USER_ID).unwrap()),
        expected
    );
    assert_eq!(
        group_ids(sorting.stream_entity_groups(&query, &CommonAttributes::USER_ID).unwrap()),
        expected
    );
}

#[test]
fn test_filtered_groups_skip_empty() {
    let dao = fixture_dao();
    let query = EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::ITEM_ID, 101)
        .build();
    let groups = dao
        .stream_entity_groups(&query, &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(group_ids(groups), vec![(10, vec![2])]);
}

#[test]
fn test_entities_without_group_attribute_left_out() {
    let mut entities = rating_entities();
    entities.push(
        Entity::builder(CommonTypes::rating(), 4)
            .set(&CommonAttributes::ITEM_ID, 100)
            .set(&CommonAttributes::RATING, 1.0)
            .build(),
    );
    let dao = EntityCollectionDao::from_entities(entities.clone()).unwrap();
    let sorting = SortingVecAccess { entities };
    let expected = vec![(10, vec![1, 2]), (20, vec![3])];

    assert_eq!(
        group_ids(dao.stream_entity_groups(&all_ratings(), &CommonAttributes::USER_ID).unwrap()),
        expected
    );
    assert_eq!(
        group_ids(sorting.stream_entity_groups(&all_ratings(), &CommonAttributes::USER_ID).unwrap()),
        expected
    );
}

// ============================================================================
// Backends that ignore sort keys
// ============================================================================

#[test]
fn test_default_grouping_fragments_over_unsorted_backend() {
    let unsorted = UnsortedVecAccess {
        entities: vec![
            Rating::new(1, 10, 100, 4.0).to_entity(),
            Rating::new(3, 20, 100, 5.0).to_entity(),
            Rating::new(2, 10, 101, 3.5).to_entity(),
        ],
    };
    let groups = unsorted
        .stream_entity_groups(&all_ratings(), &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(
        group_ids(groups),
        vec![(10, vec![1]), (20, vec![3]), (10, vec![2])]
    );
}

#[test]
fn test_unsorted_backend_fine_when_already_grouped() {
    let unsorted = UnsortedVecAccess {
        entities: rating_entities(),
    };
    let groups = unsorted
        .stream_entity_groups(&all_ratings(), &CommonAttributes::USER_ID)
        .unwrap();
    assert_eq!(group_ids(groups), vec![(10, vec![1, 2]), (20, vec![3])]);
}

// ============================================================================
// Fluent grouping
// ============================================================================

#[test]
fn test_grouped_query_over_trait_object() {
    let dao = fixture_dao();
    let sorting = SortingVecAccess {
        entities: rating_entities(),
    };
    let backends: [&dyn DataAccess; 2] = [&dao, &sorting];

    for access in backends {
        let grouped = access
            .query_view::<Rating>()
            .unwrap()
            .order_by_with(&CommonAttributes::RATING, SortOrder::Descending)
            .group_by(&CommonAttributes::ITEM_ID);
        assert_eq!(grouped.count().unwrap(), 2);

        let groups = grouped.get().unwrap();
        let summary: Vec<(i64, Vec<f64>)> = groups
            .into_iter()
            .map(|g| {
                let (item, ratings) = g.into_parts();
                (item, ratings.iter().map(|r| r.value).collect())
            })
            .collect();
        assert_eq!(summary, vec![(100, vec![5.0, 4.0]), (101, vec![3.5])]);
    }
}

#[test]
fn test_grouped_projection_failure() {
    let mut entities = rating_entities();
    entities.push(
        Entity::builder(CommonTypes::rating(), 4)
            .set(&CommonAttributes::USER_ID, 20)
            .build(),
    );
    let dao = EntityCollectionDao::from_entities(entities).unwrap();
    let grouped = dao
        .query_view::<Rating>()
        .unwrap()
        .group_by(&CommonAttributes::USER_ID);

    let results: Vec<Result<IdBox<Vec<Rating>>>> = grouped.stream().unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(Error::Projection { view: "Rating", id: 4, .. })
    ));
}

// ============================================================================
// Packed layout storage
// ============================================================================

fn packed_dao() -> EntityCollectionDao {
    let layout = lensdb::EntityDefaults::lookup(&CommonTypes::rating())
        .map(|d| d.common_attributes().clone())
        .unwrap();
    let mut builder = lensdb::EntityStoreBuilder::new();
    builder.set_layout(&CommonTypes::rating(), layout).unwrap();
    builder.add_index(&CommonTypes::rating(), "item").unwrap();
    builder.add_entities(rating_entities()).unwrap();
    EntityCollectionDao::new(builder.build().unwrap())
}

#[test]
fn test_packed_store_answers_like_row_store() {
    let packed = packed_dao();
    let rows = fixture_dao();
    let by_item = EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::ITEM_ID, 100)
        .add_sort_key(SortKey::descending(&CommonAttributes::RATING))
        .build();

    for query in [all_ratings(), by_item] {
        let a: Vec<Entity> = packed.stream_entities(&query).unwrap().collect();
        let b: Vec<Entity> = rows.stream_entities(&query).unwrap().collect();
        assert_eq!(a, b);
    }
    assert_eq!(
        group_ids(packed.stream_entity_groups(&all_ratings(), &CommonAttributes::USER_ID).unwrap()),
        vec![(10, vec![1, 2]), (20, vec![3])]
    );

    let ratings = packed.query(&CommonTypes::rating());
    assert_eq!(
        ratings.value_set(&CommonAttributes::RATING).unwrap(),
        vec![3.5, 4.0, 5.0]
    );
    let rating: Option<Rating> = packed.lookup_as(&CommonTypes::rating(), 2).unwrap();
    assert_eq!(rating, Some(Rating::new(2, 10, 101, 3.5)));
}
