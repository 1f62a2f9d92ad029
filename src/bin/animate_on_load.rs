use clap::Parser;
use motionfill::polyfill;
use motionfill::AnimationTiming;
use motionfill::Keyframe;
use motionfill::RecordingPlayer;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Run the motion path polyfill pass over an HTML file and dump the
/// animations it would start, as JSON, in start order.
#[derive(Parser, Debug)]
#[command(name = "animate_on_load", version, about)]
struct Args {
  /// HTML file to scan
  input: PathBuf,

  /// Output compact JSON instead of pretty-printing.
  #[arg(long)]
  compact: bool,
}

#[derive(Serialize)]
struct AnimationReport {
  /// Pre-order node id of the animated element.
  target: usize,
  /// Human-readable element description (tag#id.class).
  element: String,
  /// The keyframe applied as both start and end frame.
  keyframe: Keyframe,
  timing: AnimationTiming,
}

fn main() -> Result<(), Box<dyn Error>> {
  env_logger::init();
  let args = Args::parse();

  let html = fs::read_to_string(&args.input)?;
  let document = motionfill::parse_html(&html)?;

  let mut player = RecordingPlayer::new();
  polyfill::run(&document, &mut player);

  let report: Vec<AnimationReport> = player
    .into_animations()
    .into_iter()
    .map(|animation| {
      let [keyframe, _] = animation.frames;
      AnimationReport {
        target: animation.target.0,
        element: document.describe(animation.target),
        keyframe,
        timing: animation.timing,
      }
    })
    .collect();

  let json = if args.compact {
    serde_json::to_string(&report)?
  } else {
    serde_json::to_string_pretty(&report)?
  };
  println!("{}", json);
  Ok(())
}
