//! Configuration management for the handstand trainer

use crate::{
    constants::{
        DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_LANDMARK_VISIBILITY, DEFAULT_MODEL_PATH,
        DEFAULT_OUTPUT_FOURCC, DEFAULT_OUTPUT_FPS, DEFAULT_OUTPUT_PATH, DEFAULT_POSE_INPUT_SIZE,
        DEFAULT_WINDOW_NAME, SIGNIFICANT_NARROWING_DEG, SLIGHT_NARROWING_DEG, STRAIGHT_ARM_DEG,
        SYMMETRY_TOLERANCE_DEG,
    },
    handstand::Thresholds,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pose model configuration
    pub model: ModelConfig,

    /// Classification thresholds
    pub classifier: ClassifierConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Annotated video output
    pub output: OutputConfig,
}

/// Pose landmark model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the BlazePose landmark ONNX model
    pub pose_landmarker: PathBuf,

    /// Square model input resolution used when the model does not declare one
    pub input_size: i32,

    /// Minimum pose presence score for a frame to count as containing a person (0.0-1.0)
    pub min_detection_confidence: f32,
}

/// Classification thresholds in degrees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Both wrist angles below this ask for significantly narrower hands
    pub significant_narrowing_deg: f64,

    /// Both wrist angles below this ask for slightly narrower hands
    pub slight_narrowing_deg: f64,

    /// Wrist angle difference flagged as uneven weight
    pub symmetry_tolerance_deg: f64,

    /// Both elbow angles below this ask for straighter arms
    pub straight_arm_deg: f64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Title of the preview window
    pub window_name: String,

    /// Show the preview window
    pub show_window: bool,

    /// Draw the detected skeleton
    pub draw_skeleton: bool,

    /// Minimum visibility for a landmark to be drawn in the skeleton (0.0-1.0).
    /// Classification always uses every detected landmark.
    pub min_landmark_visibility: f32,
}

/// Annotated video output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file written when the input is a video file
    pub path: PathBuf,

    /// Output frame rate
    pub fps: f64,

    /// Four character codec code
    pub fourcc: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_landmarker: PathBuf::from(DEFAULT_MODEL_PATH),
            input_size: DEFAULT_POSE_INPUT_SIZE,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            significant_narrowing_deg: SIGNIFICANT_NARROWING_DEG,
            slight_narrowing_deg: SLIGHT_NARROWING_DEG,
            symmetry_tolerance_deg: SYMMETRY_TOLERANCE_DEG,
            straight_arm_deg: STRAIGHT_ARM_DEG,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            show_window: true,
            draw_skeleton: true,
            min_landmark_visibility: DEFAULT_MIN_LANDMARK_VISIBILITY,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fps: DEFAULT_OUTPUT_FPS,
            fourcc: DEFAULT_OUTPUT_FOURCC.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Thresholds for the classifier
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            significant_narrowing: self.significant_narrowing_deg,
            slight_narrowing: self.slight_narrowing_deg,
            symmetry_tolerance: self.symmetry_tolerance_deg,
            straight_arm: self.straight_arm_deg,
        }
    }
}

impl OutputConfig {
    /// Codec code as four characters
    ///
    /// # Errors
    ///
    /// Returns an error unless the code is exactly four ASCII characters
    pub fn fourcc_chars(&self) -> Result<[char; 4]> {
        let chars: Vec<char> = self.fourcc.chars().collect();
        match chars.as_slice() {
            [a, b, c, d] if chars.iter().all(char::is_ascii) => Ok([*a, *b, *c, *d]),
            _ => Err(Error::ConfigError(format!(
                "FourCC must be four ASCII characters, got {:?}",
                self.fourcc
            ))),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration values
    ///
    /// Model file existence is only checked when `check_paths` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self, check_paths: bool) -> Result<()> {
        if !(0.0..=1.0).contains(&self.model.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.display.min_landmark_visibility) {
            return Err(Error::ConfigError(
                "Landmark visibility must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.model.input_size <= 0 {
            return Err(Error::ConfigError("Model input size must be greater than 0".to_string()));
        }

        let c = &self.classifier;
        for (name, value) in [
            ("significant_narrowing_deg", c.significant_narrowing_deg),
            ("slight_narrowing_deg", c.slight_narrowing_deg),
            ("symmetry_tolerance_deg", c.symmetry_tolerance_deg),
            ("straight_arm_deg", c.straight_arm_deg),
        ] {
            if !(value > 0.0 && value <= 180.0) {
                return Err(Error::ConfigError(format!(
                    "{name} must be within (0, 180] degrees, got {value}"
                )));
            }
        }
        if c.significant_narrowing_deg > c.slight_narrowing_deg {
            return Err(Error::ConfigError(
                "significant_narrowing_deg must not exceed slight_narrowing_deg".to_string(),
            ));
        }

        if !(self.output.fps > 0.0 && self.output.fps.is_finite()) {
            return Err(Error::ConfigError("Output FPS must be greater than 0".to_string()));
        }
        self.output.fourcc_chars()?;

        if check_paths && !self.model.pose_landmarker.exists() {
            return Err(Error::ConfigError(format!(
                "Pose landmark model not found: {}",
                self.model.pose_landmarker.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Handstand Trainer Configuration

# Pose landmark model
model:
  pose_landmarker: "assets/pose_landmark_full.onnx"
  input_size: 256
  min_detection_confidence: 0.5

# Classification thresholds (degrees)
classifier:
  significant_narrowing_deg: 60.0
  slight_narrowing_deg: 70.0
  symmetry_tolerance_deg: 5.0
  straight_arm_deg: 170.0

# Display settings
display:
  window_name: "Video feed"
  show_window: true
  draw_skeleton: true
  min_landmark_visibility: 0.5

# Annotated video output (video file input only)
output:
  path: "results/output.avi"
  fps: 20.0
  fourcc: "MJPG"
"#;
