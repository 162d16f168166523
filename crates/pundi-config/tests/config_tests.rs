use std::fs;

use pundi_config::{BackendKind, Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency_symbol.is_empty());
    assert_eq!(cfg.photo_max_dimension, 150);
    assert_eq!(cfg.request_timeout_secs, 15);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = Config {
        api_url: Some("https://example.test/exec".into()),
        backend: BackendKind::Memory,
        currency_symbol: "IDR".into(),
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "backend": "memory" }"#).expect("write config");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.backend, BackendKind::Memory);
    assert_eq!(loaded.photo_quality, 0.7);
    assert_eq!(loaded.currency_symbol, "Rp");
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("write config");

    let err = ConfigManager::new(path).load().expect_err("corrupt config");
    assert!(matches!(err, ConfigError::Serde(_)));
}
