//! Error types for the handstand trainer.

use crate::landmarks::Landmark;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A landmark required by the classifier is absent or has non-finite coordinates.
    ///
    /// Only the current frame is affected; callers skip the verdict overlay and move on.
    #[error("Missing landmark: {0}")]
    MissingLandmark(Landmark),

    /// A frame was submitted for writing but the session has no video writer
    #[error("No output writer configured")]
    NoOutputWriter,

    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Capture device or video file could not be opened
    #[error("Video source error: {0}")]
    VideoSource(String),

    /// Output video could not be created
    #[error("Video writer error: {0}")]
    VideoWriter(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model loading or inference error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInputError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Model data shape or format error
    #[error("Model data format error: {0}")]
    ModelDataFormatError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the error only invalidates the current frame's analysis
    #[must_use]
    pub fn is_frame_recoverable(&self) -> bool {
        matches!(self, Self::MissingLandmark(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
