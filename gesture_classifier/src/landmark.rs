//! Hand landmarks in the 21-point convention used by common hand-tracking
//! models (wrist, four joints per finger including the tip).

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Skeleton edges drawn between landmarks.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single key point. `x`/`y` are normalized to the frame width/height,
/// with `y` growing downward. `z` is carried through from detectors that
/// report depth and is not used for classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    /// A hand must carry exactly [`LANDMARK_COUNT`] landmarks.
    WrongCount { expected: usize, found: usize },
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::WrongCount { expected, found } => {
                write!(f, "expected {} hand landmarks, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// The complete landmark set of one detected hand.
///
/// Holding a fixed-size array means the classifier never sees a partial
/// hand; length is checked once, where landmarks enter the crate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from `(x, y)` pairs.  Fails unless exactly 21 are supplied.
    pub fn from_points<I>(points: I) -> Result<Self, LandmarkError>
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let v: Vec<Landmark> = points.into_iter().map(|(x, y)| Landmark::new(x, y)).collect();
        Self::try_from(v)
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.points.iter()
    }

    pub fn as_array(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Mutable access for callers that build poses point by point.
    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if let Some(p) = self.points.get_mut(index) {
            *p = landmark;
        }
    }

    /// Planar distance between the thumb tip and the index tip, in
    /// normalized units.  Diagnostic only; classification ignores it.
    pub fn thumb_index_distance(&self) -> f32 {
        let a = self.points[THUMB_TIP];
        let b = self.points[INDEX_TIP];
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(slice: &[Landmark]) -> Result<Self, Self::Error> {
        let points = <[Landmark; LANDMARK_COUNT]>::try_from(slice).map_err(|_| {
            LandmarkError::WrongCount { expected: LANDMARK_COUNT, found: slice.len() }
        })?;
        Ok(HandLandmarks { points })
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(v: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::try_from(v.as_slice())
    }
}

impl From<HandLandmarks> for Vec<Landmark> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.to_vec()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
