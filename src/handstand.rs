//! Handstand form classification.
//!
//! Three aspects are judged for a handstand performed with the back facing
//! the camera, each aimed at holding the position with minimal strength:
//!
//! 1. hand distance, from the angle between shoulder and ground at each wrist
//! 2. symmetric weight distribution, from the difference of those two angles
//! 3. straight arms, from the elbow angles
//!
//! Every frame is judged on its own; nothing carries over between calls.

use crate::{
    constants::{
        GROUND_POINT_OFFSET, SIGNIFICANT_NARROWING_DEG, SLIGHT_NARROWING_DEG, STRAIGHT_ARM_DEG,
        SYMMETRY_TOLERANCE_DEG,
    },
    geometry::joint_angle,
    landmarks::{Landmark, LandmarkSet},
    Result,
};
use std::fmt;

/// Decision thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Both wrist angles below this: narrow hands significantly
    pub significant_narrowing: f64,
    /// Both wrist angles below this: narrow hands slightly
    pub slight_narrowing: f64,
    /// Wrist angle difference at or above this: uneven weight
    pub symmetry_tolerance: f64,
    /// Both elbow angles below this: arms bent
    pub straight_arm: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significant_narrowing: SIGNIFICANT_NARROWING_DEG,
            slight_narrowing: SLIGHT_NARROWING_DEG,
            symmetry_tolerance: SYMMETRY_TOLERANCE_DEG,
            straight_arm: STRAIGHT_ARM_DEG,
        }
    }
}

/// Hand placement verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandDistance {
    /// Hands are far too wide apart
    NarrowSignificantly,
    /// Hands are a little too wide apart
    NarrowSlightly,
    /// Hand placement is fine
    WellDone,
}

impl HandDistance {
    /// Classify from both wrist angles; the first matching rule wins
    #[must_use]
    pub fn from_wrist_angles(right: f64, left: f64, thresholds: &Thresholds) -> Self {
        // Hands placed too narrow are rare and not reported
        if right < thresholds.significant_narrowing && left < thresholds.significant_narrowing {
            Self::NarrowSignificantly
        } else if right < thresholds.slight_narrowing && left < thresholds.slight_narrowing {
            Self::NarrowSlightly
        } else {
            Self::WellDone
        }
    }

    /// Feedback text
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NarrowSignificantly => "Narrow your hand position significantly!",
            Self::NarrowSlightly => "Narrow your hand position slightly!",
            Self::WellDone => "Well Done!",
        }
    }
}

/// Weight distribution verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Wrist angles differ too much
    NonSymmetric,
    /// Weight is evenly spread
    WellDone,
}

impl Symmetry {
    /// Classify from both wrist angles
    #[must_use]
    pub fn from_wrist_angles(right: f64, left: f64, thresholds: &Thresholds) -> Self {
        if (right - left).abs() >= thresholds.symmetry_tolerance {
            Self::NonSymmetric
        } else {
            Self::WellDone
        }
    }

    /// Feedback text
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NonSymmetric => "Non-symmetric weight distribution",
            Self::WellDone => "Well Done!",
        }
    }
}

/// Arm straightness verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmStraightness {
    /// Both arms are bent
    Bent,
    /// At least one arm is straight
    WellDone,
}

impl ArmStraightness {
    /// Classify from both elbow angles.
    ///
    /// Only flags when both elbows are bent, so a single badly estimated arm
    /// does not trigger the warning.
    #[must_use]
    pub fn from_elbow_angles(right: f64, left: f64, thresholds: &Thresholds) -> Self {
        if right < thresholds.straight_arm && left < thresholds.straight_arm {
            Self::Bent
        } else {
            Self::WellDone
        }
    }

    /// Feedback text
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Bent => "Straighten your arms!",
            Self::WellDone => "Well done!",
        }
    }
}

/// Joint angles measured for one frame, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAngles {
    pub right_wrist: f64,
    pub left_wrist: f64,
    pub right_elbow: f64,
    pub left_elbow: f64,
}

impl JointAngles {
    /// Measure the four angles from a landmark set
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingLandmark`] if any shoulder, elbow or
    /// wrist is absent or malformed
    pub fn measure(landmarks: &LandmarkSet) -> Result<Self> {
        let right_shoulder = landmarks.require(Landmark::RightShoulder)?;
        let right_elbow = landmarks.require(Landmark::RightElbow)?;
        let right_wrist = landmarks.require(Landmark::RightWrist)?;
        let left_shoulder = landmarks.require(Landmark::LeftShoulder)?;
        let left_elbow = landmarks.require(Landmark::LeftElbow)?;
        let left_wrist = landmarks.require(Landmark::LeftWrist)?;

        // Horizontal reference through each wrist, pointing away from the body
        let right_ground = right_wrist.offset_x(GROUND_POINT_OFFSET);
        let left_ground = left_wrist.offset_x(-GROUND_POINT_OFFSET);

        Ok(Self {
            right_wrist: joint_angle(right_shoulder, right_wrist, right_ground),
            left_wrist: joint_angle(left_shoulder, left_wrist, left_ground),
            right_elbow: joint_angle(right_shoulder, right_elbow, right_wrist),
            left_elbow: joint_angle(left_shoulder, left_elbow, left_wrist),
        })
    }
}

/// Verdicts for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    pub hand_distance: HandDistance,
    pub symmetry: Symmetry,
    pub straight_arms: ArmStraightness,
    /// Angles the verdicts were derived from
    pub angles: JointAngles,
}

impl AnalysisResult {
    /// Apply the decision rules to measured angles
    #[must_use]
    pub fn from_angles(angles: JointAngles, thresholds: &Thresholds) -> Self {
        Self {
            hand_distance: HandDistance::from_wrist_angles(angles.right_wrist, angles.left_wrist, thresholds),
            symmetry: Symmetry::from_wrist_angles(angles.right_wrist, angles.left_wrist, thresholds),
            straight_arms: ArmStraightness::from_elbow_angles(angles.right_elbow, angles.left_elbow, thresholds),
            angles,
        }
    }

    /// Verdict texts in display order: hand distance, symmetry, straight arms
    #[must_use]
    pub fn lines(&self) -> [&'static str; 3] {
        [
            self.hand_distance.message(),
            self.symmetry.message(),
            self.straight_arms.message(),
        ]
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [hands, symmetry, arms] = self.lines();
        write!(f, "{hands} | {symmetry} | {arms}")
    }
}

/// Stateless handstand classifier
#[derive(Debug, Clone, Default)]
pub struct HandstandClassifier {
    thresholds: Thresholds,
}

impl HandstandClassifier {
    /// Create a classifier with custom thresholds
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify one frame's landmarks
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingLandmark`] if any of the six arm
    /// landmarks is absent; no partial result is produced
    pub fn classify(&self, landmarks: &LandmarkSet) -> Result<AnalysisResult> {
        let angles = JointAngles::measure(landmarks)?;
        Ok(AnalysisResult::from_angles(angles, &self.thresholds))
    }
}

/// Classify one frame's landmarks with the default thresholds
///
/// # Errors
///
/// See [`HandstandClassifier::classify`]
pub fn classify(landmarks: &LandmarkSet) -> Result<AnalysisResult> {
    HandstandClassifier::default().classify(landmarks)
}
