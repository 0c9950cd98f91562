//! Handstand form analysis for real-time video feedback.
//!
//! The library judges a handstand performed with the back facing the camera
//! on three aspects, each aimed at holding the position with minimal strength:
//! hand distance, symmetric weight distribution and straight arms.
//!
//! The processing pipeline consists of:
//! 1. Body landmark detection with a BlazePose model on ONNX Runtime
//! 2. Joint angle measurement at the wrists and elbows
//! 3. Threshold based classification into short textual verdicts
//! 4. Drawing the verdicts and skeleton onto the frame with `OpenCV`
//!
//! # Examples
//!
//! ## Classifying landmarks
//!
//! ```
//! use handstand_trainer::{
//!     geometry::Point2D,
//!     handstand::classify,
//!     landmarks::{Landmark, LandmarkSet},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut landmarks = LandmarkSet::new();
//! landmarks.insert(Landmark::RightShoulder, Point2D::new(0.6, 0.4));
//! landmarks.insert(Landmark::RightElbow, Point2D::new(0.6, 0.55));
//! landmarks.insert(Landmark::RightWrist, Point2D::new(0.6, 0.7));
//! landmarks.insert(Landmark::LeftShoulder, Point2D::new(0.4, 0.4));
//! landmarks.insert(Landmark::LeftElbow, Point2D::new(0.4, 0.55));
//! landmarks.insert(Landmark::LeftWrist, Point2D::new(0.4, 0.7));
//!
//! let result = classify(&landmarks)?;
//! for line in result.lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Processing a video
//!
//! ```no_run
//! use handstand_trainer::{
//!     handstand::HandstandClassifier,
//!     pipeline::FramePipeline,
//!     pose_detection::PoseDetector,
//!     session::{StepOutcome, TrainerSession, VideoSource},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = PoseDetector::new("assets/pose_landmark_full.onnx")?;
//! let mut pipeline = FramePipeline::new(detector, HandstandClassifier::default());
//! let mut session = TrainerSession::open(VideoSource::File("video_input/test.mp4".into()), None)?;
//!
//! loop {
//!     match session.step(&mut pipeline)? {
//!         StepOutcome::Frame { report, .. } => {
//!             if let Some(result) = report.analysis {
//!                 println!("{result}");
//!             }
//!         }
//!         StepOutcome::Dropped => continue,
//!         StepOutcome::EndOfStream => break,
//!     }
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```

/// Point type and joint angle calculation
pub mod geometry;

/// Body landmark identities and per-frame landmark sets
pub mod landmarks;

/// Handstand verdict classification
pub mod handstand;

/// Pose landmark detection using ONNX Runtime
pub mod pose_detection;

/// Verdict and skeleton drawing
pub mod overlay;

/// Per-frame detection, classification and annotation
pub mod pipeline;

/// Video capture and output lifecycle
pub mod session;

/// Coordinate conversion helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
