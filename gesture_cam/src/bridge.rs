//! Hand detection via a MediaPipe subprocess.
//!
//! The bridge script (`hand_detect.py`) prints `READY` once its model is
//! loaded.  For every frame we write a little-endian header
//! (`width`, `height`, `channels` as `u32`) followed by the RGB bytes, and
//! read back one JSON line:
//!
//! ```text
//! {"hands": [{"handedness": "Right", "score": 0.98, "landmarks": [{"x":..,"y":..,"z":..}, ...]}], "error": null}
//! ```

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use gesture_classifier::{HandLandmarks, Landmark};

use crate::frame::{ChannelOrder, Frame};
use crate::source::{DetectedHand, DetectorLost, HandDetector};

#[derive(Deserialize, Debug)]
struct BridgeHand {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score:      Option<f32>,
    landmarks:  Vec<Landmark>,
}

#[derive(Deserialize, Debug)]
struct BridgeReply {
    #[serde(default)]
    hands: Vec<BridgeHand>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one reply line.  Hands without exactly 21 landmarks are dropped
/// with a warning; a bridge-side error yields no hands.
pub fn parse_reply(line: &str) -> Result<Vec<DetectedHand>> {
    let reply: BridgeReply = serde_json::from_str(line.trim())
        .with_context(|| format!("bad detector reply: {}", line.trim()))?;

    if let Some(error) = reply.error {
        warn!(%error, "detector reported an error");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for hand in reply.hands {
        match HandLandmarks::try_from(hand.landmarks) {
            Ok(landmarks) => hands.push(DetectedHand {
                landmarks,
                handedness: hand.handedness,
                score:      hand.score,
            }),
            Err(e) => warn!(error = %e, "skipping hand"),
        }
    }
    Ok(hands)
}

/// Write the frame header and pixels in the bridge's wire format.
pub fn write_frame<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    if frame.order != ChannelOrder::Rgb {
        bail!("detector expects RGB frames");
    }
    out.write_all(&(frame.width as u32).to_le_bytes())?;
    out.write_all(&(frame.height as u32).to_le_bytes())?;
    out.write_all(&(Frame::CHANNELS as u32).to_le_bytes())?;
    out.write_all(&frame.data)?;
    out.flush()?;
    Ok(())
}

/// One request/reply round trip.  Transport failures, including a closed
/// reply stream, are [`DetectorLost`]; a bad reply only fails this frame.
pub fn exchange<W: Write, R: BufRead>(out: &mut W, input: &mut R, frame: &Frame) -> Result<Vec<DetectedHand>> {
    if let Err(e) = write_frame(out, frame) {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            return Err(DetectorLost(format!("writing frame: {}", io)).into());
        }
        return Err(e);
    }
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0)  => Err(DetectorLost("closed its output".to_string()).into()),
        Ok(_)  => parse_reply(&line),
        Err(e) => Err(DetectorLost(format!("reading reply: {}", e)).into()),
    }
}

pub struct MediaPipeDetector {
    process: Child,
    stdin:   ChildStdin,
    stdout:  BufReader<ChildStdout>,
}

impl MediaPipeDetector {
    /// Start `python script` and wait for it to report ready.
    pub fn spawn(python: &Path, script: &Path) -> Result<Self> {
        if !script.exists() {
            bail!("hand detection script not found at {}", script.display());
        }

        info!(script = %script.display(), "starting MediaPipe detector");
        let mut process = Command::new(python)
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start {}", python.display()))?;

        let stdin = process.stdin.take().context("detector stdin unavailable")?;
        let stdout = process.stdout.take().context("detector stdout unavailable")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let handshake = stdout.read_line(&mut ready);
        if handshake.is_err() || ready.trim() != "READY" {
            let _ = process.kill();
            let _ = process.wait();
            handshake.context("waiting for detector")?;
            bail!("detector did not signal ready, got {:?}", ready.trim());
        }
        info!("MediaPipe detector ready");

        Ok(MediaPipeDetector { process, stdin, stdout })
    }
}

impl HandDetector for MediaPipeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedHand>> {
        exchange(&mut self.stdin, &mut self.stdout, frame)
    }
}

impl Drop for MediaPipeDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> String {
        let v: Vec<String> = (0..n).map(|_| r#"{"x":0.5,"y":0.5,"z":-0.01}"#.to_string()).collect();
        format!("[{}]", v.join(","))
    }

    #[test]
    fn reply_with_two_hands() {
        let line = format!(
            r#"{{"hands":[{{"handedness":"Left","score":0.9,"landmarks":{p}}},{{"landmarks":{p}}}],"error":null}}"#,
            p = points(21)
        );
        let hands = parse_reply(&line).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].handedness.as_deref(), Some("Left"));
        assert_eq!(hands[0].score, Some(0.9));
        assert_eq!(hands[1].score, None);
    }

    #[test]
    fn incomplete_hand_is_skipped() {
        let line = format!(r#"{{"hands":[{{"landmarks":{}}},{{"landmarks":{}}}]}}"#, points(20), points(21));
        assert_eq!(parse_reply(&line).unwrap().len(), 1);
    }

    #[test]
    fn bridge_error_means_no_hands() {
        assert!(parse_reply(r#"{"hands":[],"error":"model crashed"}"#).unwrap().is_empty());
    }

    #[test]
    fn garbage_reply_is_an_error() {
        assert!(parse_reply("Traceback (most recent call last):").is_err());
    }

    #[test]
    fn frame_header_is_little_endian() {
        let frame = Frame::new(2, 1, ChannelOrder::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut buf = Vec::<u8>::new();
        write_frame(&mut buf, &frame).unwrap();
        assert_eq!(&buf[0..4], &[2, 0, 0, 0]);
        assert_eq!(&buf[4..8], &[1, 0, 0, 0]);
        assert_eq!(&buf[8..12], &[3, 0, 0, 0]);
        assert_eq!(&buf[12..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bgr_frames_are_refused() {
        let frame = Frame::blank(1, 1, ChannelOrder::Bgr);
        assert!(write_frame(&mut Vec::<u8>::new(), &frame).is_err());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    fn rgb() -> Frame {
        Frame::new(2, 1, ChannelOrder::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn exchange_returns_reply_hands() {
        let reply = format!("{{\"hands\":[{{\"landmarks\":{}}}]}}\n", points(21));
        let mut out = Vec::<u8>::new();
        let hands = exchange(&mut out, &mut io::Cursor::new(reply), &rgb()).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(out.len(), 12 + 6);
    }

    #[test]
    fn closed_output_means_detector_lost() {
        let err = exchange(&mut Vec::<u8>::new(), &mut io::Cursor::new(""), &rgb()).unwrap_err();
        assert!(err.downcast_ref::<DetectorLost>().is_some());
    }

    #[test]
    fn broken_pipe_means_detector_lost() {
        let err = exchange(&mut BrokenPipe, &mut io::Cursor::new(""), &rgb()).unwrap_err();
        assert!(err.downcast_ref::<DetectorLost>().is_some());
    }

    #[test]
    fn bad_reply_only_fails_the_frame() {
        let err = exchange(&mut Vec::<u8>::new(), &mut io::Cursor::new("oops\n"), &rgb()).unwrap_err();
        assert!(err.downcast_ref::<DetectorLost>().is_none());
        let err = exchange(&mut BrokenPipe, &mut io::Cursor::new(""), &Frame::blank(1, 1, ChannelOrder::Bgr)).unwrap_err();
        assert!(err.downcast_ref::<DetectorLost>().is_none());
    }

    #[cfg(unix)]
    fn script(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.sh", name, std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn wrong_handshake_is_refused() {
        let path = script("not-ready", "echo LOADING\n");
        let err = MediaPipeDetector::spawn(Path::new("sh"), &path).err().unwrap();
        assert!(err.to_string().contains("did not signal ready"));
        let _ = std::fs::remove_file(path);
    }

    #[cfg(unix)]
    #[test]
    fn exited_bridge_is_lost() {
        let path = script("exits", "echo READY\n");
        let mut det = MediaPipeDetector::spawn(Path::new("sh"), &path).unwrap();
        let err = det.detect(&rgb()).unwrap_err();
        assert!(err.downcast_ref::<DetectorLost>().is_some());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_script_fails_fast() {
        let err = MediaPipeDetector::spawn(Path::new("python3"), Path::new("/nonexistent/hand_detect.py"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("not found"));
    }
}
