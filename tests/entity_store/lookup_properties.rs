//! Lookup properties over arbitrary rating sets

use crate::common::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_added_entity_is_found(ratings in arb_ratings(40)) {
        let dao = EntityCollectionDao::from_entities(reversed(&ratings)).unwrap();
        for rating in &ratings {
            let found: Option<Rating> = dao.lookup_as(&CommonTypes::rating(), rating.id).unwrap();
            prop_assert_eq!(found.as_ref(), Some(rating));
        }
        prop_assert_eq!(dao.entity_ids(&CommonTypes::rating()).len(), ratings.len());
    }

    #[test]
    fn prop_ids_unique_with_last_write(
        ratings in arb_ratings(30),
        rewrites in prop::collection::vec((1i64..31, 0.5f64..5.0), 0..20)
    ) {
        let mut entities: Vec<Entity> = ratings.iter().map(Rating::to_entity).collect();
        let mut expected: BTreeMap<i64, f64> = ratings.iter().map(|r| (r.id, r.value)).collect();
        for (id, value) in &rewrites {
            entities.push(Rating::new(*id, 1, 100, *value).to_entity());
            expected.insert(*id, *value);
        }

        let dao = EntityCollectionDao::from_entities(entities).unwrap();
        let streamed: Vec<Rating> = dao
            .stream(&EntityQueryBuilder::new(CommonTypes::rating()).build_with_view::<Rating>())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        let streamed_ids: Vec<i64> = streamed.iter().map(|r| r.id).collect();
        prop_assert_eq!(streamed_ids, expected.keys().copied().collect::<Vec<_>>());
        for rating in &streamed {
            prop_assert_eq!(Some(&rating.value), expected.get(&rating.id));
        }
    }

    #[test]
    fn prop_unknown_ids_absent(ratings in arb_ratings(20), unknown in 100i64..200) {
        let dao = EntityCollectionDao::from_entities(reversed(&ratings)).unwrap();
        prop_assert!(dao.lookup_entity(&CommonTypes::rating(), unknown).is_none());
        prop_assert!(dao.lookup_entity(&CommonTypes::user(), 1).is_none());
    }
}
