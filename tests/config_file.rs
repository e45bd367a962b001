//! Planner configuration files.

use rrt_motion::{ConfigFileError, ConfigurationError, RRTConfig, RRT};
use std::fs;

#[test]
fn config_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");

    let config = RRTConfig::<f64>::default()
        .with_seed(2024)
        .with_max_distance(0.75)
        .with_motion_check_fraction(0.25);
    config.to_file(&path).unwrap();

    let loaded = RRTConfig::<f64>::from_file(&path).unwrap();
    assert_eq!(loaded.seed, Some(2024));
    assert_eq!(loaded.max_distance, 0.75);
    assert_eq!(loaded.motion_check_fraction, Some(0.25));
    assert!(RRT::<f64>::new(loaded).is_ok());
}

#[test]
fn hand_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    fs::write(&path, "{\n  \"max_distance\": 2,\n  \"goal_bias\": 0.5\n}\n").unwrap();

    let loaded = RRTConfig::<f32>::from_file(&path).unwrap();
    assert_eq!(loaded.max_distance, 2.0);
    assert_eq!(loaded.goal_bias, 0.5);
    assert_eq!(loaded.seed, None);
    assert_eq!(loaded.motion_check_fraction, None);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = RRTConfig::<f64>::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigFileError::Io(_))));
}

#[test]
fn out_of_range_values_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.json");
    fs::write(&path, r#"{"max_distance": -1}"#).unwrap();

    match RRTConfig::<f64>::from_file(&path) {
        Err(ConfigFileError::Invalid(ConfigurationError::InvalidMaxDistance(value))) => {
            assert_eq!(value, -1.0)
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
