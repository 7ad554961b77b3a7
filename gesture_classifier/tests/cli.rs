use std::process::Command;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.jsonl");

fn classify(args: &[&str]) -> Vec<String> {
    let out = Command::new(env!("CARGO_BIN_EXE_gesture_classify"))
        .args(args)
        .arg(SAMPLE)
        .env("RUST_LOG", "off")
        .output()
        .expect("gesture_classify runs");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout)
        .expect("utf-8 output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn plain_output_is_frame_hand_gesture() {
    assert_eq!(
        classify(&[]),
        vec![
            "0\t0\tPeace",
            "2\t0\tFist",
            "2\t1\tThumbs Up",
            "3\t0\tUnknown Gesture",
            "4\t0\tOkay!",
        ]
    );
}

#[test]
fn states_column_comes_before_gesture() {
    assert_eq!(
        classify(&["--states"]),
        vec![
            "0\t0\t[0,1,1,0,0]\tPeace",
            "2\t0\t[0,0,0,0,0]\tFist",
            "2\t1\t[1,0,0,0,0]\tThumbs Up",
            "3\t0\t[1,0,1,0,1]\tUnknown Gesture",
            "4\t0\t[0,0,1,1,1]\tOkay!",
        ]
    );
}

#[test]
fn json_output_is_one_object_per_hand() {
    let lines = classify(&["--json"]);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], r#"{"frame":0,"hand":0,"gesture":"Peace","states":[0,1,1,0,0]}"#);
    assert_eq!(lines[2], r#"{"frame":2,"hand":1,"gesture":"Thumbs Up","states":[1,0,0,0,0]}"#);
    assert_eq!(lines[3], r#"{"frame":3,"hand":0,"gesture":"Unknown Gesture","states":[1,0,1,0,1]}"#);
}

#[test]
fn missing_input_exits_nonzero() {
    let out = Command::new(env!("CARGO_BIN_EXE_gesture_classify"))
        .arg("/nonexistent/recording.jsonl")
        .env("RUST_LOG", "off")
        .output()
        .expect("gesture_classify runs");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
}
