//! YogaPose CLI: classify yoga poses from video clips.
//!
//! Usage:
//!   yogapose predict <VIDEO> --frame-start N --frame-end M
//!   yogapose classify <KEYPOINTS.json>
//!   yogapose extract <VIDEO> [--frame-start N] [--frame-end M] [-o OUT]
//!   yogapose health
//!   yogapose labels
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use yogapose_common::config::AppConfig;

mod commands;
mod request;

#[derive(Parser)]
#[command(
    name = "yogapose",
    about = "Yoga pose classification from video keypoint sequences",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/yogapose/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sequence classifier ONNX model
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Label set JSON file
    #[arg(long, global = true)]
    labels: Option<PathBuf>,

    /// Pose landmark detector ONNX model
    #[arg(long, global = true)]
    detector_model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the pose performed in a frame range of a video
    Predict {
        /// Video file, or a directory of frame images
        video: PathBuf,

        /// First frame to use (0-based, inclusive)
        #[arg(long)]
        frame_start: u64,

        /// Last frame to use (inclusive)
        #[arg(long)]
        frame_end: u64,
    },

    /// Predict the pose from a pre-extracted keypoint sequence
    Classify {
        /// JSON array of frames, each 33 joints of [x, y, z]
        keypoints: PathBuf,
    },

    /// Extract the raw keypoint sequence from a video
    Extract {
        /// Video file, or a directory of frame images
        video: PathBuf,

        /// First frame to keep (0-based, inclusive)
        #[arg(long)]
        frame_start: Option<u64>,

        /// Last frame to keep (inclusive)
        #[arg(long)]
        frame_end: Option<u64>,

        /// Write the sequence here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report whether the model and labels are loaded
    Health,

    /// List the class labels in output order
    Labels,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(path) = cli.model {
        config.model.model_path = path;
    }
    if let Some(path) = cli.labels {
        config.model.labels_path = path;
    }
    if let Some(path) = cli.detector_model {
        config.detector.model_path = path;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    yogapose_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Predict {
            video,
            frame_start,
            frame_end,
        } => commands::predict::run(&config, video, frame_start, frame_end),
        Commands::Classify { keypoints } => commands::classify::run(&config, keypoints),
        Commands::Extract {
            video,
            frame_start,
            frame_end,
            output,
        } => commands::extract::run(&config, video, frame_start, frame_end, output),
        Commands::Health => commands::health::run(&config),
        Commands::Labels => commands::labels::run(&config),
    }
}
