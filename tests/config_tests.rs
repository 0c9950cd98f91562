//! Configuration file tests


use handstand_trainer::{
    config::{Config, EXAMPLE_CONFIG},
    handstand::{HandDistance, HandstandClassifier},
    Error,
};
use std::path::PathBuf;
use test_helpers::{handstand_landmarks, scratch_dir};

#[test]
fn test_file_round_trip() {
    let dir = scratch_dir("config_round_trip");
    let path = dir.join("config.yaml");

    let mut config = Config::default();
    config.classifier.slight_narrowing_deg = 75.0;
    config.display.draw_skeleton = false;
    config.output.path = PathBuf::from("out/annotated.avi");
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.classifier.thresholds(), config.classifier.thresholds());
    assert!(!loaded.display.draw_skeleton);
    assert_eq!(loaded.output.path, PathBuf::from("out/annotated.avi"));
    assert!(loaded.validate(false).is_ok());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_example_config_loads_from_disk() {
    let dir = scratch_dir("config_example");
    let path = dir.join("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.output.fps, 20.0);
    assert_eq!(config.output.fourcc, "MJPG");
    assert_eq!(config.display.window_name, "Video feed");

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_file() {
    match Config::from_file("does/not/exist.yaml") {
        Err(Error::Io(_)) => {}
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_malformed_yaml() {
    match Config::from_yaml("classifier: [not, a, mapping]") {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Failed to parse config")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_configured_thresholds_change_verdicts() {
    let config = Config::from_yaml("classifier:\n  slight_narrowing_deg: 64.0\n").unwrap();
    let classifier = HandstandClassifier::new(config.classifier.thresholds());

    let result = classifier.classify(&handstand_landmarks(65.0, 65.0, 175.0, 175.0)).unwrap();
    assert_eq!(result.hand_distance, HandDistance::WellDone);
}
