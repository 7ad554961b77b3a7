//! gesture_cam — interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use gesture_cam::app::{run, AppConfig, InputMode};

#[derive(Parser, Debug)]
#[command(name = "gesture_cam", version, about = "Hand gesture recognition from a webcam")]
struct Cli {
    /// Replay a JSON Lines landmark recording instead of live input
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Keyboard simulation even when built with camera support
    #[arg(long, conflicts_with = "replay")]
    sim: bool,

    /// Capture device index
    #[cfg(feature = "camera")]
    #[arg(long, default_value_t = 0)]
    device: i32,

    /// MediaPipe bridge script
    #[arg(long, value_name = "PATH", default_value = "hand_detect.py")]
    detector: PathBuf,

    /// Python interpreter used to run the bridge
    #[arg(long, value_name = "PATH", default_value = "python3")]
    python: PathBuf,

    /// Ignore hands detected with a lower score
    #[arg(long, default_value_t = 0.5)]
    min_score: f32,

    /// Frame width for simulation and replay
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Frame height for simulation and replay
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Display rate limit
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let mode = match (self.replay.clone(), self.sim) {
            (Some(path), _) => InputMode::Replay(path),
            (None, true)    => InputMode::Simulation,
            (None, false)   => live_mode(&self),
        };

        AppConfig {
            mode,
            width:     self.width.max(1),
            height:    self.height.max(1),
            fps:       self.fps.max(1),
            min_score: self.min_score.clamp(0.0, 1.0),
            python:    self.python,
            detector:  self.detector,
            ..AppConfig::default()
        }
    }
}

#[cfg(feature = "camera")]
fn live_mode(cli: &Cli) -> InputMode {
    InputMode::Camera { device: cli.device }
}

#[cfg(not(feature = "camera"))]
fn live_mode(_cli: &Cli) -> InputMode {
    InputMode::Simulation
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_cam=info".into()),
        )
        .init();

    let cfg = Cli::parse().into_config();

    #[cfg(feature = "camera")]
    info!("build: camera support");
    #[cfg(not(feature = "camera"))]
    info!("build: simulation only (use --features camera for a webcam)");

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
