//! Config persistence tests

use ncview_core::NegativeRadiusMode;
use ncview_settings::{ConfigError, SettingsError, ViewerConfig};
use tempfile::TempDir;

fn customised() -> ViewerConfig {
    let mut config = ViewerConfig::new();
    config.parser.negative_radius = NegativeRadiusMode::NearSide;
    config.parser.emit_plunge_segments = true;
    config.view.zoom_step = 1.25;
    config.display.rapid = "#888888".to_string();
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = customised();

    config.save_to_file(&path).unwrap();
    let loaded = ViewerConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = customised();

    config.save_to_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"near_side\""));
    assert_eq!(ViewerConfig::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");
    let err = ViewerConfig::new().save_to_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[view]\nfit_margin = 0.9\n").unwrap();
    let err = ViewerConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(ConfigError::ValueOutOfRange { .. })));

    std::fs::write(&path, "[view\n").unwrap();
    assert!(matches!(
        ViewerConfig::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ViewerConfig::load_from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::IoError(_)));
}
