//! Video session lifecycle tests on generated video files


use handstand_trainer::{
    config::OutputConfig,
    handstand::HandstandClassifier,
    pipeline::FramePipeline,
    session::{StepOutcome, TrainerSession, VideoSource},
    Error,
};
use test_helpers::{handstand_landmarks, scratch_dir, write_test_video, ScriptedDetector};

const TEST_FRAMES: usize = 5;

fn pipeline_for(frames: usize) -> FramePipeline<ScriptedDetector> {
    // Spare detections in case the decoder reports an extra frame
    let detections = (0..frames * 2)
        .map(|_| Some(handstand_landmarks(65.0, 65.0, 175.0, 175.0)))
        .collect();
    FramePipeline::new(ScriptedDetector::new(detections), HandstandClassifier::default())
}

/// Step until the end of the file, returning the number of frames seen
fn drain(session: &mut TrainerSession, pipeline: &mut FramePipeline<ScriptedDetector>) -> u64 {
    let mut frames = 0;
    loop {
        match session.step(pipeline).unwrap() {
            StepOutcome::Frame { index, report, .. } => {
                assert_eq!(index, frames);
                assert!(report.analysis.is_some());
                frames += 1;
            }
            StepOutcome::Dropped => {}
            StepOutcome::EndOfStream => return frames,
        }
    }
}

#[test]
fn test_file_session_without_output() {
    let dir = scratch_dir("no_output");
    let input = dir.join("input.avi");
    write_test_video(&input, TEST_FRAMES, 320, 240).unwrap();

    let mut session = TrainerSession::open(VideoSource::File(input), None).unwrap();
    assert!(!session.has_writer());
    assert!(session.output_path().is_none());

    let mut pipeline = pipeline_for(TEST_FRAMES);
    let frames = drain(&mut session, &mut pipeline);
    assert!(frames > 0);
    assert_eq!(session.frames_processed(), frames);

    let frame = test_helpers::create_test_frame(240, 320).unwrap();
    assert!(matches!(session.write_frame(&frame), Err(Error::NoOutputWriter)));

    session.close().unwrap();
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_file_session_writes_output() {
    let dir = scratch_dir("with_output");
    let input = dir.join("input.avi");
    write_test_video(&input, TEST_FRAMES, 320, 240).unwrap();

    let output = OutputConfig {
        path: dir.join("results").join("output.avi"),
        ..OutputConfig::default()
    };

    let mut session = TrainerSession::open(VideoSource::File(input), Some(&output)).unwrap();
    assert!(session.has_writer());
    assert_eq!(session.output_path(), Some(output.path.as_path()));

    let mut pipeline = pipeline_for(TEST_FRAMES);
    assert!(drain(&mut session, &mut pipeline) > 0);
    session.close().unwrap();

    let metadata = std::fs::metadata(&output.path).unwrap();
    assert!(metadata.len() > 0);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_end_of_stream_is_repeatable() {
    let dir = scratch_dir("end_of_stream");
    let input = dir.join("input.avi");
    write_test_video(&input, 2, 320, 240).unwrap();

    let mut session = TrainerSession::open(VideoSource::File(input), None).unwrap();
    let mut pipeline = pipeline_for(2);
    drain(&mut session, &mut pipeline);

    assert!(matches!(session.step(&mut pipeline).unwrap(), StepOutcome::EndOfStream));
    drop(session);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = scratch_dir("missing");
    let source = VideoSource::File(dir.join("does_not_exist.avi"));

    match TrainerSession::open(source, None) {
        Err(Error::VideoSource(_)) => {}
        Err(other) => panic!("Expected VideoSource error, got {other:?}"),
        Ok(_) => panic!("Expected VideoSource error, got an open session"),
    }
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_video_source_kind() {
    assert!(VideoSource::File("clip.mp4".into()).is_file());
    assert!(!VideoSource::Camera(0).is_file());
}
