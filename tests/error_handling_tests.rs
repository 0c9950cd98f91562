//! Error handling tests

use handstand_trainer::{config::Config, landmarks::Landmark, Error};

#[test]
fn test_missing_landmark_messages() {
    let cases = [
        (Landmark::LeftWrist, "Missing landmark: left wrist"),
        (Landmark::RightShoulder, "Missing landmark: right shoulder"),
        (Landmark::LeftElbow, "Missing landmark: left elbow"),
    ];
    for (landmark, message) in cases {
        assert_eq!(Error::MissingLandmark(landmark).to_string(), message);
    }
}

#[test]
fn test_only_missing_landmark_is_frame_recoverable() {
    assert!(Error::MissingLandmark(Landmark::RightWrist).is_frame_recoverable());
    assert!(!Error::NoOutputWriter.is_frame_recoverable());
    assert!(!Error::VideoSource("camera 0".to_string()).is_frame_recoverable());
    assert!(!Error::ModelError("bad".to_string()).is_frame_recoverable());
}

#[test]
fn test_error_display() {
    assert_eq!(Error::NoOutputWriter.to_string(), "No output writer configured");
    assert_eq!(
        Error::VideoWriter("results/output.avi".to_string()).to_string(),
        "Video writer error: results/output.avi"
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_validation_errors() {
    let mut config = Config::default();
    config.display.min_landmark_visibility = -0.1;
    assert!(matches!(config.validate(false), Err(Error::ConfigError(_))));

    let mut config = Config::default();
    config.model.input_size = 0;
    assert!(matches!(config.validate(false), Err(Error::ConfigError(_))));

    let mut config = Config::default();
    config.classifier.symmetry_tolerance_deg = f64::NAN;
    assert!(matches!(config.validate(false), Err(Error::ConfigError(_))));

    let mut config = Config::default();
    config.output.fourcc = "XV".to_string();
    assert!(matches!(config.validate(false), Err(Error::ConfigError(_))));
}
