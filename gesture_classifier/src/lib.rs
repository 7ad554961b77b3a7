//! # gesture_classifier
//!
//! Static hand-gesture classification from the 21 normalized landmarks a
//! hand-tracking model emits per detected hand.
//!
//! Each finger is reduced to open/closed by comparing its tip against a
//! reference joint, and the resulting 5-vector is looked up in a fixed table.
//!
//! ## Finger rules
//!
//! | Finger | Tip | Reference | Open iff |
//! |---|---|---|---|
//! | Thumb  | 4  | 3  | `tip.x < ref.x` |
//! | Index  | 8  | 6  | `tip.y < ref.y` |
//! | Middle | 12 | 10 | `tip.y < ref.y` |
//! | Ring   | 16 | 14 | `tip.y < ref.y` |
//! | Pinky  | 20 | 18 | `tip.y < ref.y` |
//!
//! The thumb rule is a left/right comparison and assumes one hand/camera
//! mirroring convention; the finger rules assume an upright hand.
//!
//! ## Gesture table
//!
//! | Vector | Gesture |
//! |---|---|
//! | `[1,0,0,0,0]` | Thumbs Up |
//! | `[0,1,1,0,0]` | Peace |
//! | `[1,1,1,1,1]` | Open Palm |
//! | `[0,0,0,0,0]` | Fist |
//! | `[0,0,1,0,0]` | F- You |
//! | `[1,1,0,0,0]` | Saranghae |
//! | `[0,0,1,1,1]` | Okay! |
//! | anything else | Unknown Gesture |
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_classifier::{classify, Gesture, HandLandmarks};
//!
//! // Every landmark at the same spot: no tip is strictly left/above its
//! // reference joint, so every finger reads as closed.
//! let hand = HandLandmarks::from_points(std::iter::repeat((0.5, 0.5)).take(21)).unwrap();
//! assert_eq!(classify(&hand), Gesture::Fist);
//! assert_eq!(classify(&hand).label(), "Fist");
//! ```

pub mod landmark;
pub mod finger;
pub mod gesture;
pub mod record;

pub use landmark::{HandLandmarks, Landmark, LandmarkError, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use finger::{finger_states, Axis, Finger, FingerRule, FingerStates, FINGER_RULES};
pub use gesture::{classify, Gesture, GESTURE_TABLE};
pub use record::{read_records, FrameRecord, RecordError, RecordedHand};
