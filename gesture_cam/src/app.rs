//! The per-frame pipeline and the main loop.
//!
//! Each iteration is independent: capture, convert to RGB, detect,
//! classify each hand, annotate, display.  Nothing carries over between
//! frames except the simulated detector's current pose.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use tracing::{debug, info, trace, warn};

use gesture_classifier::{classify, finger_states, Gesture};

use crate::frame::Frame;
use crate::overlay::{Canvas, OverlayStyle};
use crate::source::{
    load_recording, DetectedHand, DetectorLost, FrameSource, HandDetector, SimCapture, SimDetector,
    SimInput,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where frames and hands come from.
#[derive(Clone, Debug, PartialEq)]
pub enum InputMode {
    /// Blank frames; hands chosen with the number keys.
    Simulation,
    /// Hands from a JSON Lines recording; ends with the file.
    Replay(PathBuf),
    /// Webcam plus the MediaPipe bridge.
    #[cfg(feature = "camera")]
    Camera { device: i32 },
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mode:      InputMode,
    /// Frame size for simulation and replay; also the initial window size.
    pub width:     usize,
    pub height:    usize,
    pub fps:       u32,
    /// Hands reported with a lower score are ignored.  Hands without a
    /// score always pass.
    pub min_score: f32,
    pub python:    PathBuf,
    pub detector:  PathBuf,
    pub style:     OverlayStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            #[cfg(feature = "camera")]
            mode:      InputMode::Camera { device: 0 },
            #[cfg(not(feature = "camera"))]
            mode:      InputMode::Simulation,
            width:     640,
            height:    480,
            fps:       30,
            min_score: 0.5,
            python:    PathBuf::from("python3"),
            detector:  PathBuf::from("hand_detect.py"),
            style:     OverlayStyle::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════

/// Result of processing one frame.
pub struct FrameOutcome {
    pub canvas:   Canvas,
    /// One entry per drawn hand, in detector order.
    pub gestures: Vec<Gesture>,
}

pub struct Pipeline {
    source:    Box<dyn FrameSource>,
    detector:  Box<dyn HandDetector>,
    min_score: f32,
    style:     OverlayStyle,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        min_score: f32,
        style: OverlayStyle,
    ) -> Self {
        Pipeline { source, detector, min_score, style }
    }

    /// Process the next frame.  `Ok(None)` once the source is exhausted.
    ///
    /// A detector failure on one frame is logged and the frame is shown
    /// without annotation.  [`DetectorLost`] is returned as an error.
    pub fn step(&mut self) -> Result<Option<FrameOutcome>> {
        let frame = match self.source.next_frame()? {
            Some(f) => f,
            None    => return Ok(None),
        };
        let rgb = frame.to_rgb();
        let hands = match self.detector.detect(&rgb) {
            Ok(h)  => h,
            Err(e) if e.downcast_ref::<DetectorLost>().is_some() => return Err(e),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "detection failed; frame left unannotated");
                Vec::new()
            }
        };
        Ok(Some(annotate(&rgb, &hands, self.min_score, &self.style)))
    }
}

/// Draw and classify every sufficiently confident hand.  All labels go to
/// the same spot; with several hands the last one drawn is on top.
pub fn annotate(frame: &Frame, hands: &[DetectedHand], min_score: f32, style: &OverlayStyle) -> FrameOutcome {
    let mut canvas = Canvas::from_frame(frame);
    let mut gestures = Vec::with_capacity(hands.len());

    for (i, hand) in hands.iter().enumerate() {
        if hand.score.map_or(false, |s| s < min_score) {
            debug!(hand = i, score = hand.score, "below min score");
            continue;
        }
        canvas.draw_hand(&hand.landmarks, style);

        let gesture = classify(&hand.landmarks);
        debug!(
            hand = i,
            handedness = hand.handedness.as_deref().unwrap_or("?"),
            states = %finger_states(&hand.landmarks),
            %gesture,
            "classified"
        );
        trace!(hand = i, distance = hand.landmarks.thumb_index_distance(), "thumb-index");

        canvas.draw_label(gesture.label(), style.label_origin, style.label_scale, style.label_color);
        gestures.push(gesture);
    }

    FrameOutcome { canvas, gestures }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn build_pipeline(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Pipeline> {
    let (source, detector): (Box<dyn FrameSource>, Box<dyn HandDetector>) = match &cfg.mode {
        InputMode::Simulation => {
            info!("mode: keyboard simulation (1-8 pose, 0 no hand, Q quit)");
            (
                Box::new(SimCapture { width: cfg.width, height: cfg.height }),
                Box::new(SimDetector::new(sim_rx)),
            )
        }
        InputMode::Replay(path) => {
            info!(path = %path.display(), "mode: replay");
            let (cap, det) = load_recording(path, cfg.width, cfg.height)?;
            (Box::new(cap), Box::new(det))
        }
        #[cfg(feature = "camera")]
        InputMode::Camera { device } => {
            info!(device, "mode: camera");
            let cap = crate::camera::CameraSource::open(*device)?;
            let det = crate::bridge::MediaPipeDetector::spawn(&cfg.python, &cfg.detector)?;
            (Box::new(cap), Box::new(det))
        }
    };
    Ok(Pipeline::new(source, detector, cfg.min_score, cfg.style.clone()))
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It builds the input
/// backends, opens the window and loops until the user quits, the window
/// closes, or the source runs out of frames.  Capture devices, the detector
/// process and the window are released on return.
pub fn run(cfg: AppConfig) -> Result<()> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut pipeline = build_pipeline(&cfg, sim_rx)?;
    let mut vis = Visualizer::new(cfg.width, cfg.height, cfg.fps, sim_tx)?;

    let mut frames = 0u64;
    while vis.is_open() {
        let outcome = match pipeline.step()? {
            Some(o) => o,
            None    => { info!(frames, "end of stream"); break; }
        };
        frames += 1;
        vis.show(&outcome.canvas)?;

        if !vis.poll_input() {
            info!(frames, "quit");
            break;
        }
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
