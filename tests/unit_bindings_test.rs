use std::path::PathBuf;
use windbridge::config::{Config, PropertyBinding};
use windbridge::core::PropertyTable;

fn binding(name: &str, file: &str, enabled: bool) -> PropertyBinding {
    PropertyBinding {
        name: name.to_string(),
        file: file.to_string(),
        enabled,
    }
}

fn config_with(properties: Vec<PropertyBinding>) -> Config {
    Config {
        sensor_dir: PathBuf::from("Sensors"),
        properties,
        ..Config::default()
    }
}

#[test]
fn test_table_contains_only_enabled_bindings() {
    let config = config_with(vec![
        binding("Wind.Center", "center.sensor", true),
        binding("Wind.Left", "left.sensor", false),
        binding("Wind.Right", "right.sensor", true),
    ]);
    let table = PropertyTable::from_config(&config);

    assert_eq!(table.len(), 2);
    assert!(table.resolve("Wind.Center").is_some());
    assert!(table.resolve("Wind.Left").is_none());
    assert!(table.resolve("Wind.Right").is_some());
}

#[test]
fn test_resolve_returns_path_under_sensor_dir() {
    let config = config_with(vec![binding("Wind.Center", "center.sensor", true)]);
    let table = PropertyTable::from_config(&config);

    assert_eq!(
        table.resolve("Wind.Center"),
        Some(PathBuf::from("Sensors").join("center.sensor").as_path())
    );
}

#[test]
fn test_lookup_is_exact_and_case_sensitive() {
    let config = config_with(vec![binding("Wind.Center", "center.sensor", true)]);
    let table = PropertyTable::from_config(&config);

    assert!(table.resolve("wind.center").is_none());
    assert!(table.resolve("Wind.Center ").is_none());
    assert!(table.resolve("Wind").is_none());
}

#[test]
fn test_empty_table() {
    let table = PropertyTable::from_config(&config_with(vec![]));
    assert!(table.is_empty());
    assert_eq!(table.names().count(), 0);
    assert_eq!(table.paths().count(), 0);
}
