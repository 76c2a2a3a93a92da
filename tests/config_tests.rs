// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the config file

use drone_dashboard::backends::camera::CameraBackendType;
use drone_dashboard::config::PreviewSettings;
use drone_dashboard::{AppError, Config};

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.backend, CameraBackendType::GStreamer);
    assert!(config.device_path.is_none());
    assert!(config.autostart_camera);
    assert_eq!(config.preview.width, 640);
    assert_eq!(config.preview.height, 480);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = Config {
        backend: CameraBackendType::Virtual,
        device_path: Some("/dev/video4".to_string()),
        preview: PreviewSettings {
            width: 1280,
            height: 720,
            framerate: 24,
        },
        autostart_camera: false,
    };

    config.save(&path).unwrap();
    assert_eq!(Config::load(&path).unwrap(), config);
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    match Config::load(&path) {
        Err(AppError::Config(_)) => {}
        other => panic!("expected config error, got {:?}", other),
    }
}
