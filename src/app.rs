//! Main application module for the handstand trainer.

use crate::{
    config::Config,
    handstand::HandstandClassifier,
    overlay::OverlayStyle,
    pipeline::FramePipeline,
    pose_detection::PoseDetector,
    session::{StepOutcome, TrainerSession, VideoSource},
    Result,
};
use log::{debug, info};
use opencv::highgui::{self, WINDOW_NORMAL};
use std::time::{Duration, Instant};

/// Key code of the escape key
const KEY_ESCAPE: i32 = 27;

/// How long to wait for a key press between frames, in milliseconds
const KEY_WAIT_MS: i32 = 10;

/// Pause after a dropped camera frame when no window is shown
const DROPPED_FRAME_BACKOFF: Duration = Duration::from_millis(10);

/// Whether a `wait_key` result asks the application to quit
#[must_use]
pub fn is_quit_key(key: i32) -> bool {
    key == KEY_ESCAPE || (key >= 0 && key & 0xFF == i32::from(b'q'))
}

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Show the annotated video
    All,
    /// No GUI (headless)
    None,
}

impl GuiMode {
    /// Parse a mode name; unknown names fall back to [`GuiMode::All`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "none" | "headless" => Self::None,
            _ => Self::All,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// Write annotated frames to `settings.output`
    pub write_output: bool,
    /// GUI display mode
    pub gui_mode: GuiMode,
    /// File based settings
    pub settings: Config,
}

impl AppConfig {
    /// Configuration for a source, writing output only for video files as the default
    #[must_use]
    pub fn new(video_source: VideoSource, settings: Config) -> Self {
        let write_output = video_source.is_file();
        let gui_mode = if settings.display.show_window {
            GuiMode::All
        } else {
            GuiMode::None
        };
        Self {
            video_source,
            write_output,
            gui_mode,
            settings,
        }
    }
}

/// Preview window destroyed on drop
struct PreviewWindow {
    name: String,
}

impl PreviewWindow {
    fn open(name: &str) -> Result<Self> {
        highgui::named_window(name, WINDOW_NORMAL)?;
        Ok(Self { name: name.to_string() })
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            log::warn!("Failed to close window {}: {}", self.name, e);
        }
    }
}

/// Main application struct
pub struct HandstandApp {
    config: AppConfig,
    pipeline: FramePipeline<PoseDetector>,
}

impl HandstandApp {
    /// Load the pose model and prepare the frame pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot be loaded
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing Handstand Trainer application");
        config.settings.validate(true)?;

        let detector = PoseDetector::from_config(&config.settings.model)?;
        let classifier = HandstandClassifier::new(config.settings.classifier.thresholds());
        let style = OverlayStyle {
            min_visibility: config.settings.display.min_landmark_visibility,
            ..OverlayStyle::default()
        };
        let pipeline = FramePipeline::new(detector, classifier)
            .with_style(style)
            .with_skeleton(config.settings.display.draw_skeleton);

        Ok(Self { config, pipeline })
    }

    /// Run the main application loop until the video ends or the user quits
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or a frame fails to process
    pub fn run(&mut self) -> Result<()> {
        let output = self.config.write_output.then_some(&self.config.settings.output);
        let mut session = TrainerSession::open(self.config.video_source.clone(), output)?;

        let window = match self.config.gui_mode {
            GuiMode::All => Some(PreviewWindow::open(&self.config.settings.display.window_name)?),
            GuiMode::None => None,
        };

        info!("Starting main application loop");
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();
        let mut analysed = 0u64;

        loop {
            let image = match session.step(&mut self.pipeline)? {
                StepOutcome::Frame { index, image, report } => {
                    if let Some(result) = &report.analysis {
                        analysed += 1;
                        debug!("Frame {}: {}", index, result);
                    }
                    Some(image)
                }
                StepOutcome::Dropped => None,
                StepOutcome::EndOfStream => break,
            };

            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                #[allow(clippy::cast_precision_loss)]
                let fps = session.frames_processed() as f64 / start_time.elapsed().as_secs_f64();
                info!("{:.1} fps, {} of {} frames analysed", fps, analysed, session.frames_processed());
                last_fps_update = Instant::now();
            }

            match &window {
                Some(window) => {
                    if let Some(image) = &image {
                        highgui::imshow(&window.name, image)?;
                    }
                    // Also polled on dropped frames so a stalled camera can still be quit
                    if is_quit_key(highgui::wait_key(KEY_WAIT_MS)?) {
                        info!("Exit requested by user");
                        break;
                    }
                }
                None if image.is_none() => std::thread::sleep(DROPPED_FRAME_BACKOFF),
                None => {}
            }
        }

        info!(
            "Application shutting down, {} of {} frames analysed",
            analysed,
            session.frames_processed()
        );
        drop(window);
        session.close()
    }
}
