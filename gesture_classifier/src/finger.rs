//! Per-finger open/closed state.
//!
//! All five rules live in [`FINGER_RULES`]; nothing else in the crate knows
//! which landmark is compared with which.

use std::fmt;

use crate::landmark::{
    HandLandmarks, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

// ════════════════════════════════════════════════════════════════════════════
// Finger / Axis
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] =
        [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Position of this finger in a [`FingerStates`] vector.
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb  => "thumb",
            Finger::Index  => "index",
            Finger::Middle => "middle",
            Finger::Ring   => "ring",
            Finger::Pinky  => "pinky",
        }
    }
}

/// Which coordinate a rule compares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

// ════════════════════════════════════════════════════════════════════════════
// FingerRule
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerRule {
    pub finger:    Finger,
    pub tip:       usize,
    pub reference: usize,
    pub axis:      Axis,
}

/// Thumb: tip left of the IP joint (lateral movement).
/// Other fingers: tip above the PIP joint, two indices below the tip.
pub const FINGER_RULES: [FingerRule; 5] = [
    FingerRule { finger: Finger::Thumb,  tip: THUMB_TIP,  reference: THUMB_IP,   axis: Axis::X },
    FingerRule { finger: Finger::Index,  tip: INDEX_TIP,  reference: INDEX_PIP,  axis: Axis::Y },
    FingerRule { finger: Finger::Middle, tip: MIDDLE_TIP, reference: MIDDLE_PIP, axis: Axis::Y },
    FingerRule { finger: Finger::Ring,   tip: RING_TIP,   reference: RING_PIP,   axis: Axis::Y },
    FingerRule { finger: Finger::Pinky,  tip: PINKY_TIP,  reference: PINKY_PIP,  axis: Axis::Y },
];

impl FingerRule {
    /// Open iff the tip is strictly below the reference on the rule's axis.
    /// Equality is closed.
    pub fn is_open(&self, hand: &HandLandmarks) -> bool {
        let tip = hand[self.tip];
        let reference = hand[self.reference];
        let (t, r) = match self.axis {
            Axis::X => (tip.x, reference.x),
            Axis::Y => (tip.y, reference.y),
        };
        t < r
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerStates
// ════════════════════════════════════════════════════════════════════════════

/// Open/closed flags in thumb, index, middle, ring, pinky order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    pub const fn new(open: [bool; 5]) -> Self {
        FingerStates(open)
    }

    /// Build from a 0/1 vector.  Any non-zero entry counts as open.
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        FingerStates([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn as_bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }

    pub fn is_open(&self, finger: Finger) -> bool {
        self.0[finger.slot()]
    }

    pub fn open_count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }
}

impl fmt::Display for FingerStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.as_bits();
        write!(f, "[{},{},{},{},{}]", b[0], b[1], b[2], b[3], b[4])
    }
}

/// Apply every rule in [`FINGER_RULES`] to one hand.
pub fn finger_states(hand: &HandLandmarks) -> FingerStates {
    let mut open = [false; 5];
    for rule in FINGER_RULES.iter() {
        open[rule.finger.slot()] = rule.is_open(hand);
    }
    FingerStates(open)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
