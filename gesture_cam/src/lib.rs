//! # gesture_cam
//!
//! Webcam hand-gesture recognizer.  Each frame is captured, converted to
//! RGB, passed to a hand-landmark detector, and every detected hand is
//! classified with [`gesture_classifier`] and drawn as a skeleton with its
//! gesture label.
//!
//! ## Pipeline
//!
//! ```text
//! FrameSource ──► Frame (BGR) ──► to_rgb ──► HandDetector ──► classify ──► Canvas ──► Visualizer
//! ```
//!
//! Frames are processed one at a time on a single thread; no state is kept
//! between frames.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: number keys choose the pose of a
//!   synthetic hand.  `--replay <file>` plays back a JSON Lines recording.
//! * `camera` — **Hardware mode**: OpenCV capture on device 0 with the
//!   MediaPipe bridge script (`hand_detect.py`) as detector.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `1`–`7` | Thumbs Up, Peace, Open Palm, Fist, F- You, Saranghae, Okay! |
//! | `8` | Unmatched pose |
//! | `0` | No hand |
//! | `Q` | Quit |

pub mod frame;
pub mod source;
pub mod bridge;
#[cfg(feature = "camera")]
pub mod camera;
pub mod overlay;
pub mod visualizer;
pub mod app;
