//! Handstand trainer: real-time handstand form feedback on video or webcam input.

use anyhow::Result;
use clap::Parser;
use handstand_trainer::{
    app::{AppConfig, GuiMode, HandstandApp},
    config::Config,
    session::VideoSource,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to analyse (webcam is used when omitted)
    #[arg(short, long)]
    video: Option<PathBuf>,

    /// Annotated output video (defaults to results/output.avi for video input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not write an output video
    #[arg(long, conflicts_with = "output")]
    no_output: bool,

    /// BlazePose landmark ONNX model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// GUI display mode (all, none); overrides display.show_window
    #[arg(short, long)]
    gui: Option<String>,

    /// Do not draw the pose skeleton
    #[arg(long)]
    no_skeleton: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Handstand Trainer");

    let mut settings = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(model) = args.model {
        settings.model.pose_landmarker = model;
    }
    if let Some(output) = &args.output {
        settings.output.path = output.clone();
    }
    if args.no_skeleton {
        settings.display.draw_skeleton = false;
    }

    let video_source = match args.video {
        Some(path) => VideoSource::File(path),
        None => VideoSource::Camera(args.cam),
    };

    let mut config = AppConfig::new(video_source, settings);
    if let Some(gui) = &args.gui {
        config.gui_mode = GuiMode::from_name(gui);
    }
    if args.output.is_some() {
        config.write_output = true;
    }
    if args.no_output {
        config.write_output = false;
    }

    let mut app = HandstandApp::new(config)?;
    app.run()?;

    Ok(())
}
