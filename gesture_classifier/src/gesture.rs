//! Gesture lookup from a finger-state vector.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::finger::{finger_states, FingerStates};
use crate::landmark::HandLandmarks;

/// The closed set of gestures the classifier can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    ThumbsUp,
    Peace,
    OpenPalm,
    Fist,
    FYou,
    Saranghae,
    Okay,
    /// Any finger vector not listed in [`GESTURE_TABLE`].
    Unknown,
}

/// Exact-match table, checked in order.
pub const GESTURE_TABLE: [(FingerStates, Gesture); 7] = [
    (FingerStates::from_bits([1, 0, 0, 0, 0]), Gesture::ThumbsUp),
    (FingerStates::from_bits([0, 1, 1, 0, 0]), Gesture::Peace),
    (FingerStates::from_bits([1, 1, 1, 1, 1]), Gesture::OpenPalm),
    (FingerStates::from_bits([0, 0, 0, 0, 0]), Gesture::Fist),
    (FingerStates::from_bits([0, 0, 1, 0, 0]), Gesture::FYou),
    (FingerStates::from_bits([1, 1, 0, 0, 0]), Gesture::Saranghae),
    (FingerStates::from_bits([0, 0, 1, 1, 1]), Gesture::Okay),
];

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::ThumbsUp, Gesture::Peace, Gesture::OpenPalm, Gesture::Fist,
        Gesture::FYou, Gesture::Saranghae, Gesture::Okay, Gesture::Unknown,
    ];

    pub fn from_states(states: FingerStates) -> Gesture {
        GESTURE_TABLE
            .iter()
            .find(|(pattern, _)| *pattern == states)
            .map(|&(_, g)| g)
            .unwrap_or(Gesture::Unknown)
    }

    /// The text shown on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::ThumbsUp  => "Thumbs Up",
            Gesture::Peace     => "Peace",
            Gesture::OpenPalm  => "Open Palm",
            Gesture::Fist      => "Fist",
            Gesture::FYou      => "F- You",
            Gesture::Saranghae => "Saranghae",
            Gesture::Okay      => "Okay!",
            Gesture::Unknown   => "Unknown Gesture",
        }
    }

    /// The finger vector that produces this gesture, if any.
    pub fn pattern(&self) -> Option<FingerStates> {
        GESTURE_TABLE.iter().find(|(_, g)| g == self).map(|&(p, _)| p)
    }

    pub fn is_known(&self) -> bool {
        *self != Gesture::Unknown
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Gesture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classify one hand.
pub fn classify(hand: &HandLandmarks) -> Gesture {
    Gesture::from_states(finger_states(hand))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::*;

    /// Upright hand with the thumb rule and each finger rule set per `bits`.
    /// Open fingers have their tip above the PIP, closed ones below it.
    fn hand(bits: [u8; 5]) -> HandLandmarks {
        let mut h = HandLandmarks::new([Landmark::new(0.5, 0.6); LANDMARK_COUNT]);
        h.set(THUMB_IP, Landmark::new(0.40, 0.55));
        h.set(THUMB_TIP, Landmark::new(if bits[0] == 1 { 0.30 } else { 0.45 }, 0.50));
        let fingers = [
            (INDEX_PIP, INDEX_TIP, 0.45),
            (MIDDLE_PIP, MIDDLE_TIP, 0.50),
            (RING_PIP, RING_TIP, 0.55),
            (PINKY_PIP, PINKY_TIP, 0.60),
        ];
        for (i, &(pip, tip, x)) in fingers.iter().enumerate() {
            h.set(pip, Landmark::new(x, 0.40));
            let y = if bits[i + 1] == 1 { 0.20 } else { 0.48 };
            h.set(tip, Landmark::new(x, y));
        }
        h
    }

    #[test]
    fn table_vectors_map_to_their_labels() {
        let expected = [
            ([1, 0, 0, 0, 0], "Thumbs Up"),
            ([0, 1, 1, 0, 0], "Peace"),
            ([1, 1, 1, 1, 1], "Open Palm"),
            ([0, 0, 0, 0, 0], "Fist"),
            ([0, 0, 1, 0, 0], "F- You"),
            ([1, 1, 0, 0, 0], "Saranghae"),
            ([0, 0, 1, 1, 1], "Okay!"),
        ];
        for (bits, label) in expected {
            assert_eq!(Gesture::from_states(FingerStates::from_bits(bits)).label(), label);
            assert_eq!(classify(&hand(bits)).label(), label, "landmarks for {:?}", bits);
        }
    }

    #[test]
    fn every_other_vector_is_unknown() {
        let mut unknown = 0;
        for n in 0u8..32 {
            let bits = [(n >> 4) & 1, (n >> 3) & 1, (n >> 2) & 1, (n >> 1) & 1, n & 1];
            let s = FingerStates::from_bits(bits);
            let g = Gesture::from_states(s);
            let listed = GESTURE_TABLE.iter().any(|(p, _)| *p == s);
            assert_eq!(g.is_known(), listed, "{}", s);
            if !listed { unknown += 1; }
        }
        assert_eq!(unknown, 32 - GESTURE_TABLE.len());
    }

    #[test]
    fn alternating_vector_is_unknown() {
        assert_eq!(classify(&hand([1, 0, 1, 0, 1])), Gesture::Unknown);
        assert_eq!(Gesture::Unknown.to_string(), "Unknown Gesture");
    }

    #[test]
    fn peace_with_thumb_right_of_joint() {
        let h = hand([0, 1, 1, 0, 0]);
        assert!(h[THUMB_TIP].x > h[THUMB_IP].x);
        assert_eq!(classify(&h), Gesture::Peace);
    }

    #[test]
    fn curled_hand_is_fist() {
        let h = hand([0, 0, 0, 0, 0]);
        assert_eq!(finger_states(&h).as_bits(), [0, 0, 0, 0, 0]);
        assert_eq!(classify(&h), Gesture::Fist);
    }

    #[test]
    fn classify_is_repeatable() {
        let h = hand([0, 0, 1, 1, 1]);
        let first = classify(&h);
        classify(&hand([1, 1, 1, 1, 1]));
        assert_eq!(classify(&h), first);
    }

    #[test]
    fn thumb_tip_on_joint_is_not_thumbs_up() {
        let mut h = hand([1, 0, 0, 0, 0]);
        assert_eq!(classify(&h), Gesture::ThumbsUp);
        let joint = h[THUMB_IP];
        h.set(THUMB_TIP, Landmark::new(joint.x, 0.1));
        assert_eq!(classify(&h), Gesture::Fist);
    }

    #[test]
    fn patterns_are_unique() {
        for (i, (a, _)) in GESTURE_TABLE.iter().enumerate() {
            for (b, _) in &GESTURE_TABLE[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Gesture::Unknown.pattern(), None);
        assert_eq!(Gesture::Okay.pattern(), Some(FingerStates::from_bits([0, 0, 1, 1, 1])));
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(serde_json::to_string(&Gesture::FYou).unwrap(), "\"F- You\"");
    }
}
