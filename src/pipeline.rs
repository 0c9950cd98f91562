//! Per-frame processing: landmark detection, classification and annotation.

use crate::{
    handstand::{AnalysisResult, HandstandClassifier},
    landmarks::LandmarkSet,
    overlay::{draw_skeleton, draw_verdicts, OverlayStyle},
    pose_detection::LandmarkDetector,
    Error, Result,
};
use log::debug;
use opencv::core::Mat;

/// Outcome of processing one frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Landmarks found in the frame, if a person was detected
    pub landmarks: Option<LandmarkSet>,
    /// Verdicts for the frame, if every required landmark was present
    pub analysis: Option<AnalysisResult>,
}

/// Detector, classifier and overlay wired together
pub struct FramePipeline<D: LandmarkDetector> {
    detector: D,
    classifier: HandstandClassifier,
    style: OverlayStyle,
    draw_skeleton: bool,
}

impl<D: LandmarkDetector> FramePipeline<D> {
    /// Create a pipeline
    pub fn new(detector: D, classifier: HandstandClassifier) -> Self {
        Self {
            detector,
            classifier,
            style: OverlayStyle::default(),
            draw_skeleton: true,
        }
    }

    /// Override the overlay style
    #[must_use]
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable or disable skeleton drawing
    #[must_use]
    pub fn with_skeleton(mut self, draw_skeleton: bool) -> Self {
        self.draw_skeleton = draw_skeleton;
        self
    }

    /// Analyse landmarks already extracted from a frame.
    ///
    /// A missing arm landmark is not an error here: the frame simply gets no verdicts.
    ///
    /// # Errors
    ///
    /// Propagates any error other than [`Error::MissingLandmark`]
    pub fn analyse(&self, landmarks: &LandmarkSet) -> Result<Option<AnalysisResult>> {
        match self.classifier.classify(landmarks) {
            Ok(result) => {
                debug!("{result} ({:?})", result.angles);
                Ok(Some(result))
            }
            Err(Error::MissingLandmark(landmark)) => {
                debug!("Skipping analysis, missing {landmark}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Detect, classify and annotate one frame in place
    ///
    /// # Errors
    ///
    /// Returns an error if detection or drawing fails
    pub fn process(&mut self, frame: &mut Mat) -> Result<FrameReport> {
        let Some(landmarks) = self.detector.detect(frame)? else {
            debug!("No pose in frame");
            return Ok(FrameReport::default());
        };

        let analysis = self.analyse(&landmarks)?;

        if let Some(result) = &analysis {
            draw_verdicts(frame, result, &self.style)?;
        }
        if self.draw_skeleton {
            draw_skeleton(frame, &landmarks, &self.style)?;
        }

        Ok(FrameReport {
            landmarks: Some(landmarks),
            analysis,
        })
    }
}
