//! JSON Lines recordings of detected hands, one frame per line:
//!
//! ```text
//! {"hands": [{"landmarks": [{"x":0.51,"y":0.83}, ...21 points...], "handedness": "Right", "score": 0.97}]}
//! ```
//!
//! The same shape is what the MediaPipe bridge prints per frame, so a bridge
//! session piped to a file is a valid recording.

use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::landmark::HandLandmarks;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedHand {
    pub landmarks:  HandLandmarks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score:      Option<f32>,
}

impl RecordedHand {
    pub fn new(landmarks: HandLandmarks) -> Self {
        RecordedHand { landmarks, handedness: None, score: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default)]
    pub hands: Vec<RecordedHand>,
}

#[derive(Debug)]
pub enum RecordError {
    Io(std::io::Error),
    /// `line` is 1-based.
    Parse { line: usize, source: serde_json::Error },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Io(e) => write!(f, "read error: {}", e),
            RecordError::Parse { line, source } => write!(f, "line {}: {}", line, source),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Io(e) => Some(e),
            RecordError::Parse { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Io(e)
    }
}

/// Parse a recording lazily.  Blank lines are skipped but still counted
/// for error line numbers.
pub fn read_records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<FrameRecord, RecordError>> {
    reader.lines().enumerate().filter_map(|(i, line)| {
        let line = match line {
            Ok(l) => l,
            Err(e) => return Some(Err(RecordError::Io(e))),
        };
        if line.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str::<FrameRecord>(&line)
                .map_err(|source| RecordError::Parse { line: i + 1, source }),
        )
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
