//! Drawing of verdicts and the pose skeleton onto video frames.

use crate::{
    constants::{
        DEFAULT_MIN_LANDMARK_VISIBILITY, OVERLAY_FONT_SCALE, OVERLAY_LINE_SPACING, OVERLAY_ORIGIN, OVERLAY_THICKNESS, SKELETON_CIRCLE_RADIUS,
        SKELETON_THICKNESS,
    },
    handstand::AnalysisResult,
    landmarks::{Landmark, LandmarkSet, POSE_CONNECTIONS},
    utils::normalized_to_pixel,
    Result,
};
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8, LINE_AA},
    prelude::*,
};

/// Aspect labels printed in front of each verdict, in display order
pub const VERDICT_LABELS: [&str; 3] = ["Hand Position", "Symmetry", "Arms"];

/// Colors and layout used for drawing
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    /// Verdict text color (BGR)
    pub text_color: Scalar,
    /// Landmark dot color (BGR)
    pub landmark_color: Scalar,
    /// Skeleton edge color (BGR)
    pub connection_color: Scalar,
    /// Top-left anchor of the first verdict line
    pub origin: Point,
    /// Vertical distance between verdict lines
    pub line_spacing: i32,
    /// Landmarks less visible than this are left out of the skeleton
    pub min_visibility: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text_color: Scalar::new(255.0, 0.0, 0.0, 0.0),
            landmark_color: Scalar::new(245.0, 117.0, 66.0, 0.0),
            connection_color: Scalar::new(245.0, 66.0, 230.0, 0.0),
            origin: Point::new(OVERLAY_ORIGIN.0, OVERLAY_ORIGIN.1),
            line_spacing: OVERLAY_LINE_SPACING,
            min_visibility: DEFAULT_MIN_LANDMARK_VISIBILITY,
        }
    }
}

impl OverlayStyle {
    /// Baseline position of the verdict line at `index`
    #[must_use]
    pub fn line_position(&self, index: usize) -> Point {
        let offset = i32::try_from(index).unwrap_or(i32::MAX).saturating_mul(self.line_spacing);
        Point::new(self.origin.x, self.origin.y.saturating_add(offset))
    }

    fn is_drawn(&self, landmarks: &LandmarkSet, landmark: Landmark) -> bool {
        landmarks
            .visibility(landmark)
            .is_some_and(|v| v >= self.min_visibility)
    }
}

/// Labelled verdict lines in display order
#[must_use]
pub fn verdict_lines(result: &AnalysisResult) -> Vec<String> {
    VERDICT_LABELS
        .iter()
        .zip(result.lines())
        .map(|(label, verdict)| format!("{label}: {verdict}"))
        .collect()
}

/// Print the verdicts top to bottom onto the frame
///
/// # Errors
///
/// Returns an error if `OpenCV` text rendering fails
pub fn draw_verdicts(frame: &mut Mat, result: &AnalysisResult, style: &OverlayStyle) -> Result<()> {
    for (i, line) in verdict_lines(result).iter().enumerate() {
        imgproc::put_text(
            frame,
            line,
            style.line_position(i),
            FONT_HERSHEY_SIMPLEX,
            OVERLAY_FONT_SCALE,
            style.text_color,
            OVERLAY_THICKNESS,
            LINE_AA,
            false,
        )?;
    }
    Ok(())
}

/// Draw landmark dots and the connections between them.
///
/// Only landmarks at least as visible as `style.min_visibility` are drawn.
///
/// # Errors
///
/// Returns an error if `OpenCV` drawing fails
pub fn draw_skeleton(frame: &mut Mat, landmarks: &LandmarkSet, style: &OverlayStyle) -> Result<()> {
    let (width, height) = (frame.cols(), frame.rows());

    for (from, to) in POSE_CONNECTIONS {
        if !(style.is_drawn(landmarks, from) && style.is_drawn(landmarks, to)) {
            continue;
        }
        if let (Some(a), Some(b)) = (landmarks.get(from), landmarks.get(to)) {
            imgproc::line(
                frame,
                normalized_to_pixel(a, width, height),
                normalized_to_pixel(b, width, height),
                style.connection_color,
                SKELETON_THICKNESS,
                LINE_8,
                0,
            )?;
        }
    }

    for (landmark, point) in landmarks.iter() {
        if !style.is_drawn(landmarks, landmark) {
            continue;
        }
        imgproc::circle(
            frame,
            normalized_to_pixel(point, width, height),
            SKELETON_CIRCLE_RADIUS,
            style.landmark_color,
            SKELETON_THICKNESS,
            LINE_8,
            0,
        )?;
    }

    Ok(())
}
