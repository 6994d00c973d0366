// Copyright 2025 Cowboy AI, LLC.

use std::fs;

use discipline_sets::{
    AttributeSelector, ClassificationEngine, InMemoryHost, IndexError, IndexerConfig,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

#[test]
fn config_file_drives_patterns_and_folder_names() {
    let path = std::env::temp_dir().join(format!("discipline-sets-{}.toml", Uuid::new_v4()));
    fs::write(
        &path,
        r#"
        patterns = ["_HVAC_", "_PLUM_"]

        [folders]
        disciplines = "Disciplines"
        clash_sets = "Clash"
        "#,
    )
    .unwrap();
    let config = IndexerConfig::load(&path);
    fs::remove_file(&path).unwrap();
    let config = config.unwrap();

    let mut host = InMemoryHost::new();
    let hvac = host.add_root("Plant_HVAC_L2");
    let duct = host.add_child(hvac, "Duct").unwrap();
    host.set_property(duct, "Element", "System Name", "Supply Air 1").unwrap();
    host.add_root("Plant_ARCH_L2");

    let mut engine = ClassificationEngine::open(host, config).unwrap();
    let summary = engine.build_disciplines().unwrap();
    assert_eq!(summary.folder, "Disciplines");
    assert_eq!(summary.disciplines, vec!["HVAC"]);

    let built = engine
        .build_attribute_sets(AttributeSelector::SystemName, &["HVAC".to_string()])
        .unwrap();
    assert_eq!(built.folder, "Clash");
    assert_eq!(built.created, 1);
}

#[test]
fn invalid_config_file_is_reported() {
    let path = std::env::temp_dir().join(format!("discipline-sets-{}.toml", Uuid::new_v4()));
    fs::write(&path, "patterns = 3").unwrap();
    let result = IndexerConfig::load(&path);
    fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(IndexError::Configuration(_))));
}

#[test]
fn schema_round_trips_through_json() {
    let schema = IndexerConfig::json_schema();
    let json = serde_json::to_string_pretty(&schema).unwrap();
    assert!(json.contains("leaf_collision"));
    assert!(json.contains("max_descendants_per_root"));
}
