//! Configuration loading and application

use crate::common::*;
use lensdb::CONFIG_FILE_NAME;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_loaded_config_drives_build() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
default_indexes = ["user"]
derive_defaults = false
sort_buffer_limit = 2

[views]
Rating = "rating"
"#,
    );
    let dao = configured_dao(StoreConfig::load(&path).unwrap());

    assert_eq!(dao.entity_types().len(), 1);
    assert_eq!(dao.sort_buffer_limit(), Some(2));

    let by_user = EntityQueryBuilder::new(CommonTypes::rating())
        .add_filter_field(&CommonAttributes::USER_ID, 10)
        .add_sort_key(SortKey::descending(&CommonAttributes::RATING))
        .build();
    assert_eq!(
        dao.plan(&by_user).explain(),
        "index-probe(rating.user) -> sort"
    );
    assert_eq!(ids(dao.stream_entities(&by_user).unwrap()), vec![1, 2]);

    let everything = EntityQueryBuilder::new(CommonTypes::rating())
        .add_sort_key(SortKey::descending(&CommonAttributes::RATING))
        .build();
    let err = dao.stream_entities(&everything).unwrap_err();
    assert!(matches!(err, Error::UnsupportedQuery(_)));
}

#[test]
fn test_config_view_mapping() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[views]\nRating = \"scores\"\n");

    let config = StoreConfig::load(&path).unwrap();
    let mut builder = EntityCollectionDao::builder();
    builder.with_config(config);
    builder
        .add_entity(
            Entity::builder(EntityType::new("scores"), 7)
                .set(&CommonAttributes::USER_ID, 1)
                .set(&CommonAttributes::ITEM_ID, 2)
                .set(&CommonAttributes::RATING, 3.0)
                .build(),
        )
        .unwrap();
    let dao = builder.build().unwrap();

    let ratings = dao.query_view::<Rating>().unwrap().get().unwrap();
    assert_eq!(ratings, vec![Rating::new(7, 1, 2, 3.0)]);
}

#[test]
fn test_saved_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        default_indexes: vec!["item".to_string()],
        sort_buffer_limit: Some(1000),
        ..StoreConfig::default()
    };
    let path = write_config(&dir, &config.to_toml_string().unwrap());
    assert_eq!(StoreConfig::load(&path).unwrap(), config);
}

#[test]
fn test_malformed_config_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "sort_buffer_limit = \"lots\"\n");
    let err = StoreConfig::load(&path).unwrap_err();
    assert!(err.is_configuration());
}
