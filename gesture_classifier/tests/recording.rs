use std::io::Cursor;

use gesture_classifier::{classify, finger_states, read_records, FrameRecord, Gesture};

const SAMPLE: &str = include_str!("data/sample.jsonl");

fn frames() -> Vec<FrameRecord> {
    read_records(Cursor::new(SAMPLE))
        .collect::<Result<_, _>>()
        .expect("sample recording parses")
}

#[test]
fn sample_recording_classifies_per_hand() {
    let got: Vec<Vec<Gesture>> = frames()
        .iter()
        .map(|f| f.hands.iter().map(|h| classify(&h.landmarks)).collect())
        .collect();
    assert_eq!(
        got,
        vec![
            vec![Gesture::Peace],
            vec![],
            vec![Gesture::Fist, Gesture::ThumbsUp],
            vec![Gesture::Unknown],
            vec![Gesture::Okay],
        ]
    );
}

#[test]
fn sample_recording_keeps_metadata() {
    let f = frames();
    assert_eq!(f[2].hands[1].handedness.as_deref(), Some("Left"));
    assert_eq!(f[3].hands[0].score, None);
    assert_eq!(finger_states(&f[3].hands[0].landmarks).to_string(), "[1,0,1,0,1]");
}
