//! Video session: owns the capture device and the optional output writer.
//!
//! A session is opened once, stepped frame by frame and closed. Both video
//! resources are released exactly once, either by [`TrainerSession::close`]
//! or when the session is dropped.

use crate::{
    config::OutputConfig,
    pipeline::{FramePipeline, FrameReport},
    pose_detection::LandmarkDetector,
    utils::f64_to_i32_clamp,
    Error, Result,
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};
use std::path::{Path, PathBuf};

/// Where frames come from
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(PathBuf),
}

impl VideoSource {
    /// Whether the source ends on its own
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Capture device released on drop
struct CaptureGuard {
    capture: VideoCapture,
    released: bool,
}

impl CaptureGuard {
    fn open(source: &VideoSource) -> Result<Self> {
        let capture = match source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                VideoCapture::new(*index, videoio::CAP_ANY)?
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path.display());
                VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?
            }
        };

        if !capture.is_opened()? {
            return Err(Error::VideoSource(format!("Cannot open {source:?}")));
        }

        Ok(Self {
            capture,
            released: false,
        })
    }

    fn frame_size(&self) -> Result<Size> {
        let width = self.capture.get(CAP_PROP_FRAME_WIDTH)?;
        let height = self.capture.get(CAP_PROP_FRAME_HEIGHT)?;
        Ok(Size::new(
            f64_to_i32_clamp(width, 0, i32::MAX),
            f64_to_i32_clamp(height, 0, i32::MAX),
        ))
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.capture.release()?;
        }
        Ok(())
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release video capture: {}", e);
        }
    }
}

/// Video writer released on drop
struct WriterGuard {
    writer: VideoWriter,
    path: PathBuf,
    released: bool,
}

impl WriterGuard {
    fn open(output: &OutputConfig, frame_size: Size) -> Result<Self> {
        if frame_size.width <= 0 || frame_size.height <= 0 {
            return Err(Error::VideoWriter(format!(
                "Unknown frame size {}x{} for {}",
                frame_size.width,
                frame_size.height,
                output.path.display()
            )));
        }

        if let Some(parent) = output.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let [c1, c2, c3, c4] = output.fourcc_chars()?;
        let fourcc = VideoWriter::fourcc(c1, c2, c3, c4)?;
        let writer = VideoWriter::new(&output.path.to_string_lossy(), fourcc, output.fps, frame_size, true)?;

        if !writer.is_opened()? {
            return Err(Error::VideoWriter(format!("Cannot create {}", output.path.display())));
        }

        info!(
            "Writing {}x{} @ {} fps to {}",
            frame_size.width,
            frame_size.height,
            output.fps,
            output.path.display()
        );

        Ok(Self {
            writer,
            path: output.path.clone(),
            released: false,
        })
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.writer.release()?;
            info!("Closed output video {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for WriterGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release video writer: {}", e);
        }
    }
}

/// Result of one session step
#[derive(Debug)]
pub enum StepOutcome {
    /// A frame was read, analysed and annotated
    Frame {
        /// Zero-based index of the frame
        index: u64,
        /// Annotated frame
        image: Mat,
        /// Detection and classification outcome
        report: FrameReport,
    },
    /// The camera delivered no frame this time
    Dropped,
    /// The video file has no more frames
    EndOfStream,
}

/// An open video session
pub struct TrainerSession {
    source: VideoSource,
    capture: CaptureGuard,
    writer: Option<WriterGuard>,
    frames: u64,
    consecutive_drops: u64,
}

impl TrainerSession {
    /// Open the video source and, if requested, the output writer
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened or the writer cannot be created
    pub fn open(source: VideoSource, output: Option<&OutputConfig>) -> Result<Self> {
        let capture = CaptureGuard::open(&source)?;

        let writer = match output {
            Some(output) => Some(WriterGuard::open(output, capture.frame_size()?)?),
            None => None,
        };

        Ok(Self {
            source,
            capture,
            writer,
            frames: 0,
            consecutive_drops: 0,
        })
    }

    /// Video source of this session
    #[must_use]
    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    /// Whether annotated frames are being written
    #[must_use]
    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    /// Output file, if any
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.writer.as_ref().map(|w| w.path.as_path())
    }

    /// Number of frames processed so far
    #[must_use]
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Read, analyse and annotate the next frame, writing it out if a writer is open
    ///
    /// # Errors
    ///
    /// Returns an error if reading, detection, drawing or writing fails
    pub fn step<D: LandmarkDetector>(&mut self, pipeline: &mut FramePipeline<D>) -> Result<StepOutcome> {
        let mut frame = Mat::default();
        if !self.capture.capture.read(&mut frame)? || frame.empty() {
            if self.source.is_file() {
                info!("End of video file reached");
                return Ok(StepOutcome::EndOfStream);
            }
            self.consecutive_drops += 1;
            if self.consecutive_drops == 1 {
                warn!("Failed to read frame, retrying...");
            } else {
                debug!("{} frames dropped in a row", self.consecutive_drops);
            }
            return Ok(StepOutcome::Dropped);
        }
        if self.consecutive_drops > 0 {
            info!("Frames resumed after {} drops", self.consecutive_drops);
            self.consecutive_drops = 0;
        }

        let index = self.frames;
        let report = pipeline.process(&mut frame)?;
        if report.analysis.is_none() {
            debug!("Frame {} shown without verdicts", index);
        }

        if self.has_writer() {
            self.write_frame(&frame)?;
        }

        self.frames += 1;
        Ok(StepOutcome::Frame {
            index,
            image: frame,
            report,
        })
    }

    /// Append a frame to the output video
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoOutputWriter`] if the session has no writer, or the
    /// `OpenCV` error if writing fails
    pub fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::NoOutputWriter)?;
        writer.writer.write(frame)?;
        Ok(())
    }

    /// Release the capture and writer, reporting any failure
    ///
    /// # Errors
    ///
    /// Returns the first release error
    pub fn close(mut self) -> Result<()> {
        info!("Closing session after {} frames", self.frames);
        let capture_result = self.capture.release();
        let writer_result = match self.writer.as_mut() {
            Some(writer) => writer.release(),
            None => Ok(()),
        };
        capture_result.and(writer_result)
    }
}
