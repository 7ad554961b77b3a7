//! Display window using `minifb`.
//!
//! The window also owns keyboard input: `Q` quits, and in simulation mode
//! the number keys pick the pose the simulated detector reports.
//!
//! | Key | Pose |
//! |---|---|
//! | `1` | Thumbs Up |
//! | `2` | Peace |
//! | `3` | Open Palm |
//! | `4` | Fist |
//! | `5` | F- You |
//! | `6` | Saranghae |
//! | `7` | Okay! |
//! | `8` | unmatched pose |
//! | `0` | no hand |

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions};

use gesture_classifier::Gesture;

use crate::overlay::Canvas;
use crate::source::SimInput;

pub const WINDOW_TITLE: &str = "Hand Gesture Recognition";

/// Key bindings for the simulated detector.
pub const SIM_KEYS: [(Key, SimInput); 9] = [
    (Key::Key1, SimInput::Pose(Gesture::ThumbsUp)),
    (Key::Key2, SimInput::Pose(Gesture::Peace)),
    (Key::Key3, SimInput::Pose(Gesture::OpenPalm)),
    (Key::Key4, SimInput::Pose(Gesture::Fist)),
    (Key::Key5, SimInput::Pose(Gesture::FYou)),
    (Key::Key6, SimInput::Pose(Gesture::Saranghae)),
    (Key::Key7, SimInput::Pose(Gesture::Okay)),
    (Key::Key8, SimInput::Pose(Gesture::Unknown)),
    (Key::Key0, SimInput::NoHand),
];

pub struct Visualizer {
    window: Window,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, fps: u32, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width, height,
            WindowOptions {
                resize: true,
                scale_mode: ScaleMode::AspectRatioStretch,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening window: {}", e))?;

        let fps = fps.max(1) as u64;
        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / fps)));

        Ok(Visualizer { window, sim_tx })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Present one annotated frame.  Also pumps window events.
    pub fn show(&mut self, canvas: &Canvas) -> Result<()> {
        self.window
            .update_with_buffer(&canvas.buf, canvas.width, canvas.height)
            .map_err(|e| anyhow!("updating window: {}", e))
    }

    /// Check keys pressed since the last frame.  Returns false on quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) { return false; }

        for (key, input) in SIM_KEYS {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                // Nobody listens outside simulation mode.
                let _ = self.sim_tx.send(input);
            }
        }
        true
    }
}
