use std::fs;

use microattrs::{Error, FeatureConfig, Mode, Options, Precedence, Schema};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("microattrs.toml");
    fs::write(&path, "strict = true\ndiff = true\n").unwrap();

    let config = FeatureConfig::load(&path).unwrap();
    assert!(config.strict);
    assert!(config.diff);
    assert!(!config.validations);
    assert_eq!(config.precedence, Precedence::InputFirst);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = FeatureConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, FeatureConfig::default());
}

#[test]
fn test_configured_schema_uses_the_strategy() {
    let config = FeatureConfig::from_toml("strict = true").unwrap();
    let schema = Schema::builder("Configured")
        .attribute("name")
        .attribute_with("kind", Options::with_default("plain"))
        .configured(&config)
        .build();

    assert_eq!(schema.strategy().mode(), Mode::Strict);
    assert!(matches!(
        schema.new_instance(json!({})),
        Err(Error::MissingAttributes(_))
    ));
}

#[test]
fn test_invalid_toml_is_reported() {
    let err = FeatureConfig::from_toml("strict = ").unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}
