//! Derived entities

use crate::common::*;
use lensdb::EntityStoreBuilder;

#[test]
fn test_default_derivations_create_users_and_items() {
    let dao = configured_dao(StoreConfig::default());

    assert_eq!(
        dao.entity_types().into_iter().collect::<Vec<_>>(),
        vec![CommonTypes::item(), CommonTypes::rating(), CommonTypes::user()]
    );
    assert_eq!(
        dao.entity_ids(&CommonTypes::user()).into_iter().collect::<Vec<_>>(),
        vec![10, 20]
    );
    assert_eq!(
        dao.entity_ids(&CommonTypes::item()).into_iter().collect::<Vec<_>>(),
        vec![100, 101]
    );
    let user = dao.lookup_entity(&CommonTypes::user(), 10).unwrap();
    assert!(user.is_bare());
}

#[test]
fn test_explicit_entities_win_over_derived() {
    let named = Entity::builder(CommonTypes::item(), 100)
        .set(&CommonAttributes::NAME, "Heat".to_string())
        .build();

    let mut builder = EntityCollectionDao::builder();
    builder
        .add_entity(named.clone())
        .unwrap()
        .add_entities(rating_entities())
        .unwrap();
    let dao = builder.build().unwrap();

    assert_eq!(dao.lookup_entity(&CommonTypes::item(), 100), Some(named));
    assert!(dao
        .lookup_entity(&CommonTypes::item(), 101)
        .is_some_and(|e| e.is_bare()));
}

#[test]
fn test_entities_added_after_derivation_replace_derived() {
    let mut builder = EntityStoreBuilder::new();
    builder.add_entities(rating_entities()).unwrap();
    builder
        .derive_entities(&CommonTypes::user(), &CommonTypes::rating(), &CommonAttributes::USER_ID)
        .unwrap();
    let named = Entity::builder(CommonTypes::user(), 20)
        .set(&CommonAttributes::NAME, "bea".to_string())
        .build();
    builder.add_entity(named.clone()).unwrap();

    let dao = EntityCollectionDao::new(builder.build().unwrap());
    assert_eq!(dao.lookup_entity(&CommonTypes::user(), 20), Some(named));
    assert_eq!(dao.entity_ids(&CommonTypes::user()).len(), 2);
}

#[test]
fn test_custom_derivation() {
    let mut builder = EntityCollectionDao::builder();
    builder.with_config(StoreConfig {
        derive_defaults: false,
        ..StoreConfig::default()
    });
    builder
        .add_entities(rating_entities())
        .unwrap()
        .derive_entities(&EntityType::new("movie"), &CommonTypes::rating(), &CommonAttributes::ITEM_ID)
        .unwrap();
    let dao = builder.build().unwrap();

    assert!(dao.entity_ids(&CommonTypes::item()).is_empty());
    assert_eq!(
        dao.entity_ids(&EntityType::new("movie")).into_iter().collect::<Vec<_>>(),
        vec![100, 101]
    );
}
