//! gesture_classify — classify recorded hand landmarks without a camera.
//!
//! Reads a JSON Lines recording (file or stdin) and prints one gesture per
//! detected hand.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info, trace};

use gesture_classifier::{classify, finger_states, read_records, Gesture};

#[derive(Parser, Debug)]
#[command(name = "gesture_classify", version, about = "Classify hand gestures from a landmark recording")]
struct Cli {
    /// JSON Lines recording; reads stdin when omitted
    input: Option<PathBuf>,

    /// Also print the finger-state vector
    #[arg(long)]
    states: bool,

    /// Print one JSON object per hand instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct HandOutput {
    frame:   usize,
    hand:    usize,
    gesture: Gesture,
    states:  [u8; 5],
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_classify=info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(f))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frames = 0usize;
    let mut hands = 0usize;

    for (frame, record) in read_records(reader).enumerate() {
        let record = record.context("reading recording")?;
        frames += 1;
        for (hand, recorded) in record.hands.iter().enumerate() {
            hands += 1;
            let states = finger_states(&recorded.landmarks);
            let gesture = classify(&recorded.landmarks);
            debug!(frame, hand, %states, %gesture, "classified");
            trace!(frame, hand, distance = recorded.landmarks.thumb_index_distance(), "thumb-index");

            if cli.json {
                let line = serde_json::to_string(&HandOutput {
                    frame,
                    hand,
                    gesture,
                    states: states.as_bits(),
                })?;
                writeln!(out, "{}", line)?;
            } else if cli.states {
                writeln!(out, "{}\t{}\t{}\t{}", frame, hand, states, gesture)?;
            } else {
                writeln!(out, "{}\t{}\t{}", frame, hand, gesture)?;
            }
        }
    }

    info!(frames, hands, "done");
    Ok(())
}
