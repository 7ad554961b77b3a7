//! Frame capture and hand detection — from a webcam, a recording, or the
//! keyboard simulator.
//!
//! The pipeline only sees the [`FrameSource`] and [`HandDetector`] traits;
//! it doesn't need to know whether hands came from a model, a file, or a
//! key press.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::{Context, Result};
use tracing::info;

use gesture_classifier::landmark::*;
use gesture_classifier::{read_records, FingerStates, FrameRecord, Gesture, HandLandmarks, Landmark};

use crate::frame::{ChannelOrder, Frame};

pub use gesture_classifier::RecordedHand as DetectedHand;

// ════════════════════════════════════════════════════════════════════════════
// Traits
// ════════════════════════════════════════════════════════════════════════════

/// Anything that yields frames.  `Ok(None)` is end-of-stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Anything that locates hands in an RGB frame.
///
/// An error normally costs one frame.  A detector that can no longer
/// answer at all returns [`DetectorLost`] (possibly under added context),
/// which ends the run.
pub trait HandDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedHand>>;
}

/// The detector is gone for good, e.g. its process exited.
#[derive(Debug)]
pub struct DetectorLost(pub String);

impl fmt::Display for DetectorLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand detector lost: {}", self.0)
    }
}

impl std::error::Error for DetectorLost {}

// ════════════════════════════════════════════════════════════════════════════
// Simulation — keyboard-chosen poses on a blank frame
// ════════════════════════════════════════════════════════════════════════════

/// Endless black frames in the capture device's native order.
pub struct SimCapture {
    pub width:  usize,
    pub height: usize,
}

impl FrameSource for SimCapture {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(Some(Frame::blank(self.width, self.height, ChannelOrder::Bgr)))
    }
}

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Show a hand posed as this gesture.  `Gesture::Unknown` shows a pose
    /// that matches no table entry.
    Pose(Gesture),
    /// Remove the hand from view.
    NoHand,
}

/// Finger vector used for the simulated unmatched pose.
pub const UNMATCHED_POSE: FingerStates = FingerStates::from_bits([1, 0, 1, 0, 1]);

/// Detector driven by [`SimInput`] events from the window.  The current
/// pose persists until the next key press.
pub struct SimDetector {
    rx:   Receiver<SimInput>,
    pose: Option<FingerStates>,
}

impl SimDetector {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimDetector { rx, pose: None }
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pose(g)) => {
                    self.pose = Some(g.pattern().unwrap_or(UNMATCHED_POSE));
                    info!(gesture = %g, "sim pose");
                }
                Ok(SimInput::NoHand) => {
                    self.pose = None;
                    info!("sim hand removed");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl HandDetector for SimDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedHand>> {
        self.drain();
        Ok(self.pose.map(|s| DetectedHand::new(synth_hand(s))).into_iter().collect())
    }
}

/// An upright hand whose fingers are open or curled per `states`.
///
/// Open fingers run straight up from the knuckles; curled ones fold back
/// so the tip ends below the PIP joint.  An open thumb points left of its
/// IP joint, a closed one tucks across the palm.
pub fn synth_hand(states: FingerStates) -> HandLandmarks {
    let mut h = HandLandmarks::new([Landmark::new(0.5, 0.85); LANDMARK_COUNT]);
    h.set(WRIST,     Landmark::new(0.50, 0.85));
    h.set(THUMB_CMC, Landmark::new(0.42, 0.79));
    h.set(THUMB_MCP, Landmark::new(0.36, 0.72));
    h.set(THUMB_IP,  Landmark::new(0.32, 0.65));
    h.set(
        THUMB_TIP,
        if states.as_array()[0] { Landmark::new(0.27, 0.59) } else { Landmark::new(0.42, 0.63) },
    );

    let columns = [
        (INDEX_MCP,  0.42),
        (MIDDLE_MCP, 0.49),
        (RING_MCP,   0.56),
        (PINKY_MCP,  0.63),
    ];
    for (i, &(mcp, x)) in columns.iter().enumerate() {
        let open = states.as_array()[i + 1];
        h.set(mcp, Landmark::new(x, 0.58));
        let (pip, dip, tip) = if open { (0.47, 0.40, 0.33) } else { (0.50, 0.55, 0.57) };
        h.set(mcp + 1, Landmark::new(x, pip));
        h.set(mcp + 2, Landmark::new(x, dip));
        h.set(mcp + 3, Landmark::new(x + 0.01, tip));
    }
    h
}

// ════════════════════════════════════════════════════════════════════════════
// Replay — recorded hands, one frame per line
// ════════════════════════════════════════════════════════════════════════════

/// Blank frames, one per recorded line; ends with the recording.
pub struct ReplayCapture {
    remaining: usize,
    width:     usize,
    height:    usize,
}

impl FrameSource for ReplayCapture {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame::blank(self.width, self.height, ChannelOrder::Bgr)))
    }
}

/// Hands from a recording, handed out in frame order.
pub struct ReplayDetector {
    frames: VecDeque<FrameRecord>,
}

impl HandDetector for ReplayDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedHand>> {
        Ok(self.frames.pop_front().map(|f| f.hands).unwrap_or_default())
    }
}

/// Load a whole recording and split it into a matched capture/detector pair.
pub fn load_recording(
    path: &Path,
    width: usize,
    height: usize,
) -> Result<(ReplayCapture, ReplayDetector)> {
    let file = File::open(path).with_context(|| format!("opening recording {}", path.display()))?;
    let frames: VecDeque<FrameRecord> = read_records(BufReader::new(file))
        .collect::<Result<_, _>>()
        .with_context(|| format!("parsing recording {}", path.display()))?;
    info!(frames = frames.len(), path = %path.display(), "recording loaded");
    Ok(replay_pair(frames, width, height))
}

pub fn replay_pair(
    frames: VecDeque<FrameRecord>,
    width: usize,
    height: usize,
) -> (ReplayCapture, ReplayDetector) {
    (ReplayCapture { remaining: frames.len(), width, height }, ReplayDetector { frames })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_classifier::classify;
    use std::sync::mpsc;

    #[test]
    fn synth_hand_matches_every_gesture() {
        for g in Gesture::ALL {
            let states = g.pattern().unwrap_or(UNMATCHED_POSE);
            assert_eq!(classify(&synth_hand(states)), g, "{}", g);
        }
    }

    #[test]
    fn synth_hand_stays_in_frame() {
        let h = synth_hand(FingerStates::from_bits([1, 1, 1, 1, 1]));
        for lm in h.iter() {
            assert!((0.0..=1.0).contains(&lm.x) && (0.0..=1.0).contains(&lm.y));
        }
    }

    #[test]
    fn sim_detector_starts_empty() {
        let (_tx, rx) = mpsc::channel();
        let mut det = SimDetector::new(rx);
        let frame = Frame::blank(4, 4, ChannelOrder::Rgb);
        assert!(det.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn sim_detector_keeps_last_pose() {
        let (tx, rx) = mpsc::channel();
        let mut det = SimDetector::new(rx);
        let frame = Frame::blank(4, 4, ChannelOrder::Rgb);
        tx.send(SimInput::Pose(Gesture::Fist)).unwrap();
        tx.send(SimInput::Pose(Gesture::Peace)).unwrap();
        for _ in 0..3 {
            let hands = det.detect(&frame).unwrap();
            assert_eq!(hands.len(), 1);
            assert_eq!(classify(&hands[0].landmarks), Gesture::Peace);
        }
        tx.send(SimInput::NoHand).unwrap();
        assert!(det.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn sim_detector_survives_dropped_sender() {
        let (tx, rx) = mpsc::channel();
        let mut det = SimDetector::new(rx);
        tx.send(SimInput::Pose(Gesture::Okay)).unwrap();
        drop(tx);
        let frame = Frame::blank(4, 4, ChannelOrder::Rgb);
        assert_eq!(det.detect(&frame).unwrap().len(), 1);
    }

    #[test]
    fn sim_capture_is_native_order() {
        let mut cap = SimCapture { width: 8, height: 6 };
        let f = cap.next_frame().unwrap().unwrap();
        assert_eq!((f.width, f.height, f.order), (8, 6, ChannelOrder::Bgr));
    }

    #[test]
    fn replay_pair_ends_together() {
        let hand = DetectedHand::new(synth_hand(FingerStates::from_bits([0, 0, 0, 0, 0])));
        let frames: VecDeque<FrameRecord> = vec![
            FrameRecord { hands: vec![hand.clone()] },
            FrameRecord::default(),
        ].into();
        let (mut cap, mut det) = replay_pair(frames, 4, 4);

        let f = cap.next_frame().unwrap().unwrap();
        assert_eq!(det.detect(&f).unwrap(), vec![hand]);
        let f = cap.next_frame().unwrap().unwrap();
        assert!(det.detect(&f).unwrap().is_empty());
        assert!(cap.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_recording_is_an_error() {
        let err = load_recording(Path::new("/nonexistent/rec.jsonl"), 4, 4).err().unwrap();
        assert!(err.to_string().contains("opening recording"));
    }
}
