//! Constants used throughout the application

/// Wrist angle below which both hands are far too wide apart (degrees)
pub const SIGNIFICANT_NARROWING_DEG: f64 = 60.0;

/// Wrist angle below which both hands are somewhat too wide apart (degrees)
pub const SLIGHT_NARROWING_DEG: f64 = 70.0;

/// Left/right wrist angle difference at which weight is considered uneven (degrees)
pub const SYMMETRY_TOLERANCE_DEG: f64 = 5.0;

/// Elbow angle below which an arm counts as bent (degrees)
pub const STRAIGHT_ARM_DEG: f64 = 170.0;

/// Horizontal offset of the synthetic ground point from each wrist
pub const GROUND_POINT_OFFSET: f64 = 1.0;

/// Verdict overlay layout
pub const OVERLAY_ORIGIN: (i32, i32) = (10, 30);
pub const OVERLAY_LINE_SPACING: i32 = 35;
pub const OVERLAY_FONT_SCALE: f64 = 1.0;
pub const OVERLAY_THICKNESS: i32 = 1;

/// Skeleton drawing sizes
pub const SKELETON_THICKNESS: i32 = 2;
pub const SKELETON_CIRCLE_RADIUS: i32 = 2;

/// Pose landmark model defaults
pub const DEFAULT_POSE_INPUT_SIZE: i32 = 256;
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_MIN_LANDMARK_VISIBILITY: f32 = 0.5;

/// Values per landmark in the model output (x, y, z, visibility, presence)
pub const POSE_VALUES_PER_LANDMARK: usize = 5;

/// Output video defaults
pub const DEFAULT_OUTPUT_FPS: f64 = 20.0;
pub const DEFAULT_OUTPUT_FOURCC: &str = "MJPG";
pub const DEFAULT_OUTPUT_PATH: &str = "results/output.avi";

/// Default model location
pub const DEFAULT_MODEL_PATH: &str = "assets/pose_landmark_full.onnx";

/// Display window title
pub const DEFAULT_WINDOW_NAME: &str = "Video feed";
