use crate::{
    config::ModelConfig,
    constants::{DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_POSE_INPUT_SIZE, POSE_VALUES_PER_LANDMARK},
    geometry::Point2D,
    landmarks::{Landmark, LandmarkSet, POSE_LANDMARK_COUNT},
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::{self, Mat, Scalar, Size, Vec3f, BORDER_CONSTANT, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Source of per-frame body landmarks
pub trait LandmarkDetector {
    /// Detect the body landmarks of the person in a BGR frame.
    ///
    /// Returns `Ok(None)` when no person is found. Every landmark the model
    /// reports is returned along with its visibility.
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>>;
}

/// Mapping between a frame and the square model input it was letterboxed into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    frame_width: f64,
    frame_height: f64,
    side: f64,
    pad_left: f64,
    pad_top: f64,
    input_size: f64,
}

impl Letterbox {
    /// Centre a `width` x `height` frame in a square and scale it to `input_size`
    #[must_use]
    pub fn new(width: i32, height: i32, input_size: i32) -> Self {
        let side = width.max(height);
        Self {
            frame_width: f64::from(width),
            frame_height: f64::from(height),
            side: f64::from(side),
            pad_left: f64::from((side - width) / 2),
            pad_top: f64::from((side - height) / 2),
            input_size: f64::from(input_size),
        }
    }

    /// Border widths (top, bottom, left, right) in frame pixels
    #[allow(clippy::cast_possible_truncation)] // Pads are whole pixels by construction
    fn borders(&self) -> (i32, i32, i32, i32) {
        let side = self.side as i32;
        let width = self.frame_width as i32;
        let height = self.frame_height as i32;
        let left = self.pad_left as i32;
        let top = self.pad_top as i32;
        (top, side - height - top, left, side - width - left)
    }

    /// Convert model input pixel coordinates to normalized frame coordinates
    #[must_use]
    pub fn to_normalized(&self, model_x: f64, model_y: f64) -> Point2D {
        let scale = self.side / self.input_size;
        Point2D::new(
            (model_x * scale - self.pad_left) / self.frame_width,
            (model_y * scale - self.pad_top) / self.frame_height,
        )
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Number of elements of a tensor shape, `None` if any dimension is dynamic
fn element_count(dims: &[Option<u32>]) -> Option<usize> {
    dims.iter()
        .map(|d| d.map(|v| v as usize))
        .try_fold(1usize, |acc, d| d.map(|v| acc * v))
}

/// Index of the output holding the landmark rows
fn landmarks_output_index(shapes: &[Vec<Option<u32>>]) -> Option<usize> {
    shapes.iter().position(|dims| {
        element_count(dims).is_some_and(|n| {
            n >= POSE_LANDMARK_COUNT * POSE_VALUES_PER_LANDMARK && n % POSE_VALUES_PER_LANDMARK == 0
        })
    })
}

/// Index of the single-value pose presence output, if the model has one
fn presence_output_index(shapes: &[Vec<Option<u32>>]) -> Option<usize> {
    shapes.iter().position(|dims| element_count(dims) == Some(1))
}

/// Decode raw landmark rows `(x, y, z, visibility, presence)` into a landmark set.
///
/// Coordinates are in model input pixels; visibility is a logit.
///
/// # Errors
///
/// Returns [`Error::ModelOutputError`] if fewer than 33 rows are present
pub fn decode_landmarks(values: &[f32], letterbox: &Letterbox) -> Result<LandmarkSet> {
    let needed = POSE_LANDMARK_COUNT * POSE_VALUES_PER_LANDMARK;
    if values.len() < needed {
        return Err(Error::ModelOutputError(format!(
            "Expected at least {needed} landmark values, got {}",
            values.len()
        )));
    }

    let mut landmarks = LandmarkSet::new();
    // Rows past the body landmarks are auxiliary ROI points
    for (index, row) in values.chunks_exact(POSE_VALUES_PER_LANDMARK).enumerate() {
        let Some(landmark) = Landmark::from_index(index) else {
            break;
        };
        let point = letterbox.to_normalized(f64::from(row[0]), f64::from(row[1]));
        landmarks.insert_with_visibility(landmark, point, sigmoid(row[3]));
    }

    Ok(landmarks)
}

/// BlazePose landmark model running on `ONNX` Runtime
pub struct PoseDetector {
    session: Session,
    input_size: i32,
    landmarks_output: usize,
    presence_output: Option<usize>,
    min_detection_confidence: f32,
}

impl PoseDetector {
    /// Load a BlazePose landmark model with the default presence threshold
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file is missing or cannot be loaded
    /// - The model has no outputs
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        Self::with_min_confidence(model_path, DEFAULT_MIN_DETECTION_CONFIDENCE)
    }

    /// Load a BlazePose landmark model with an explicit presence threshold
    ///
    /// # Errors
    ///
    /// See [`PoseDetector::new`]
    pub fn with_min_confidence<P: AsRef<Path>>(model_path: P, min_detection_confidence: f32) -> Result<Self> {
        Self::load(model_path.as_ref(), DEFAULT_POSE_INPUT_SIZE, min_detection_confidence)
    }

    /// Load the model described by a configuration section.
    ///
    /// `input_size` is only used when the model does not declare its input resolution.
    ///
    /// # Errors
    ///
    /// See [`PoseDetector::new`]
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::load(
            &config.pose_landmarker,
            config.input_size,
            config.min_detection_confidence,
        )
    }

    fn load(model_path: &Path, fallback_input_size: i32, min_detection_confidence: f32) -> Result<Self> {
        log::info!(
            "Initializing PoseDetector with model: {}",
            model_path.display()
        );
        if !model_path.is_file() {
            return Err(Error::ModelError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)
            .map_err(|e| Error::ModelError(format!("Failed to load {}: {e}", model_path.display())))?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Model has no inputs".to_string()))?;

        // NHWC [batch, height, width, channels]
        let input_size = match input_meta.dimensions.get(1).copied().flatten() {
            Some(size) => i32::try_from(size)
                .map_err(|_| Error::ModelInputError(format!("Input size {size} out of range")))?,
            None => fallback_input_size,
        };

        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        let shapes: Vec<Vec<Option<u32>>> = session.outputs.iter().map(|o| o.dimensions.clone()).collect();

        let landmarks_output = landmarks_output_index(&shapes).unwrap_or_else(|| {
            log::warn!(
                "No output with a static landmark shape among {:?}, using output #0",
                shapes
            );
            0
        });
        let presence_output = presence_output_index(&shapes);

        log::debug!(
            "Pose model input size {}, landmarks output #{}, presence output {:?}",
            input_size,
            landmarks_output,
            presence_output
        );

        Ok(Self {
            session,
            input_size,
            landmarks_output,
            presence_output,
            min_detection_confidence,
        })
    }

    /// Model input resolution
    #[must_use]
    pub fn input_size(&self) -> i32 {
        self.input_size
    }

    /// Letterbox, resize and normalize a BGR frame into an NHWC RGB tensor
    fn preprocess(&self, frame: &Mat, letterbox: &Letterbox) -> Result<Array4<f32>> {
        let (top, bottom, left, right) = letterbox.borders();
        let mut square = Mat::default();
        core::copy_make_border(
            frame,
            &mut square,
            top,
            bottom,
            left,
            right,
            BORDER_CONSTANT,
            Scalar::all(0.0),
        )?;

        let mut resized = Mat::default();
        imgproc::resize(
            &square,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let pixels = float_image.data_typed::<Vec3f>()?;
        let data: Vec<f32> = pixels.iter().flat_map(|px| [px[0], px[1], px[2]]).collect();

        #[allow(clippy::cast_sign_loss)] // Input size is positive
        let size = self.input_size as usize;
        Array4::from_shape_vec((1, size, size, 3), data)
            .map_err(|e| Error::ModelDataFormatError(format!("Failed to create array: {e}")))
    }

    /// Run the model and return every output flattened
    fn forward(&self, input: Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        outputs
            .iter()
            .map(|output| -> Result<Vec<f32>> {
                let tensor = output.try_extract::<f32>()?;
                let values = tensor.view().iter().copied().collect();
                Ok(values)
            })
            .collect()
    }
}

impl LandmarkDetector for PoseDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>> {
        if frame.empty() {
            return Err(Error::InvalidInput("Empty frame".to_string()));
        }

        let letterbox = Letterbox::new(frame.cols(), frame.rows(), self.input_size);
        let input = self.preprocess(frame, &letterbox)?;
        let outputs = self.forward(input)?;

        if let Some(index) = self.presence_output {
            let score = outputs.get(index).and_then(|o| o.first()).copied().unwrap_or(0.0);
            if score < self.min_detection_confidence {
                log::debug!("No person detected (presence {score:.2})");
                return Ok(None);
            }
        }

        let values = outputs.get(self.landmarks_output).ok_or_else(|| {
            Error::ModelOutputError(format!("Missing output #{}", self.landmarks_output))
        })?;

        let landmarks = decode_landmarks(values, &letterbox)?;
        log::debug!("Detected {} landmarks", landmarks.len());
        Ok(Some(landmarks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handstand::classify;

    /// Raw model rows with every landmark at the centre, fully visible
    fn model_rows(count: usize) -> Vec<f32> {
        (0..count).flat_map(|_| [128.0, 128.0, 0.0, 4.0, 4.0]).collect()
    }

    fn set_row(values: &mut [f32], landmark: Landmark, x: f32, y: f32, visibility_logit: f32) {
        let start = landmark.index() * POSE_VALUES_PER_LANDMARK;
        values[start] = x;
        values[start + 1] = y;
        values[start + 3] = visibility_logit;
    }

    #[test]
    fn test_low_visibility_wrist_is_still_classified() {
        let mut values = model_rows(39);
        set_row(&mut values, Landmark::RightShoulder, 150.0, 100.0, 4.0);
        set_row(&mut values, Landmark::RightElbow, 152.0, 140.0, 4.0);
        set_row(&mut values, Landmark::RightWrist, 154.0, 180.0, 4.0);
        set_row(&mut values, Landmark::LeftShoulder, 106.0, 100.0, 4.0);
        set_row(&mut values, Landmark::LeftElbow, 104.0, 140.0, 4.0);
        set_row(&mut values, Landmark::LeftWrist, 102.0, 180.0, -1.0);

        let landmarks = decode_landmarks(&values, &Letterbox::new(256, 256, 256)).unwrap();

        assert_eq!(landmarks.len(), POSE_LANDMARK_COUNT);
        let visibility = landmarks.visibility(Landmark::LeftWrist).unwrap();
        assert!(visibility < 0.5, "got {visibility}");
        assert!(classify(&landmarks).is_ok());
    }

    #[test]
    fn test_decode_maps_to_normalized_frame() {
        let mut values = model_rows(POSE_LANDMARK_COUNT);
        set_row(&mut values, Landmark::Nose, 128.0, 64.0, 0.0);

        let landmarks = decode_landmarks(&values, &Letterbox::new(640, 480, 256)).unwrap();
        let nose = landmarks.get(Landmark::Nose).unwrap();
        assert!((nose.x - 0.5).abs() < 1e-9);
        assert!((nose.y - (160.0 - 80.0) / 480.0).abs() < 1e-9);
        assert!((landmarks.visibility(Landmark::Nose).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_decode_rejects_short_output() {
        let values = model_rows(POSE_LANDMARK_COUNT - 1);
        assert!(matches!(
            decode_landmarks(&values, &Letterbox::new(256, 256, 256)),
            Err(Error::ModelOutputError(_))
        ));
    }

    #[test]
    fn test_output_selection() {
        let shapes = vec![
            vec![Some(1), Some(195)],
            vec![Some(1), Some(1)],
            vec![Some(1), Some(256), Some(256), Some(1)],
        ];
        assert_eq!(landmarks_output_index(&shapes), Some(0));
        assert_eq!(presence_output_index(&shapes), Some(1));
    }

    #[test]
    fn test_dynamic_landmark_shape_is_not_selected() {
        let shapes = vec![vec![None, Some(195)], vec![Some(1), Some(1)]];
        assert_eq!(landmarks_output_index(&shapes), None);
        assert_eq!(element_count(&[None, Some(195)]), None);
    }

    #[test]
    fn test_missing_model_is_model_error() {
        match PoseDetector::new("does/not/exist.onnx") {
            Err(Error::ModelError(msg)) => assert!(msg.contains("not found")),
            Err(other) => panic!("Expected ModelError, got {other:?}"),
            Ok(_) => panic!("Expected ModelError, got a detector"),
        }
    }

    #[test]
    fn test_letterbox_landscape() {
        let letterbox = Letterbox::new(640, 480, 256);
        assert_eq!(letterbox.borders(), (80, 80, 0, 0));

        // Centre of the model input is the centre of the frame
        let centre = letterbox.to_normalized(128.0, 128.0);
        assert!((centre.x - 0.5).abs() < 1e-12);
        assert!((centre.y - 0.5).abs() < 1e-12);

        // Top of the real image starts below the padding
        let top_left = letterbox.to_normalized(0.0, 32.0);
        assert!(top_left.x.abs() < 1e-12);
        assert!(top_left.y.abs() < 1e-12);
    }

    #[test]
    fn test_letterbox_portrait_odd_padding() {
        let letterbox = Letterbox::new(1079, 1920, 256);
        let (top, bottom, left, right) = letterbox.borders();
        assert_eq!((top, bottom), (0, 0));
        assert_eq!(left + right + 1079, 1920);

        let bottom_right = letterbox.to_normalized(256.0, 256.0);
        assert!(bottom_right.y > 0.999 && bottom_right.y < 1.001);
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
