//! coach_replay - run the rep classifier over a recorded or synthetic pose stream.
//!
//! Frames come from a JSON-lines recording (`{"landmarks": [[x, y], ...]}` per
//! line, `{"landmarks": null}` for no pose) or from `stub://<EXERCISE>?reps=N`.
//! A summary is printed at the end; `--json` also prints one line per frame.

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

use form_coach::{
    CoachConfig, CoachError, FrameEvent, ReplayConfig, ReplaySource, Session, SessionSnapshot,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "coach_replay",
    about = "Count reps and grade form over a pose landmark stream"
)]
struct Args {
    /// Exercise name as listed by coach_catalog (e.g. "SQUAT")
    #[arg(long)]
    exercise: String,

    /// JSON-lines recording or stub://<EXERCISE>?reps=N (defaults to a synthetic run)
    #[arg(long, value_name = "PATH|stub://")]
    frames: Option<String>,

    /// Extra TOML exercise catalog (overrides COACH_CATALOG_PATH)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Print one JSON line per frame on stdout
    #[arg(long)]
    json: bool,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE", env = "COACH_UI")]
    ui: String,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    sequence: u64,
    event: Option<FrameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dropped: Option<String>,
    #[serde(flatten)]
    snapshot: &'a SessionSnapshot,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty, args.json || !stdout_is_tty);

    let mut config = CoachConfig::load()?;
    if let Some(path) = args.catalog {
        config.catalog_path = Some(path);
    }

    let catalog = {
        let _stage = ui.stage("Load exercise catalog");
        config.catalog()?
    };

    let source = args
        .frames
        .unwrap_or_else(|| format!("stub://{}", args.exercise.replace(' ', "_")));
    let mut frames = {
        let _stage = ui.stage("Open pose stream");
        ReplaySource::new(
            ReplayConfig {
                source,
                target_fps: config.target_fps,
            },
            &catalog,
        )?
    };

    let mut session = Session::with_settings(&catalog, config.session.clone());
    session.begin(&args.exercise)?;

    {
        let _stage = ui.stage("Classify frames");
        let progress = ui.frames(frames.len_hint());
        while let Some(frame) = frames.next_frame()? {
            let (event, dropped) = match session.observe_detection(frame.detection.as_ref()) {
                Ok(outcome) => (outcome.map(|o| o.event), None),
                Err(err @ CoachError::MissingLandmarks { .. }) => (None, Some(err.to_string())),
                Err(err) => return Err(err.into()),
            };
            let snapshot = session
                .snapshot()
                .ok_or_else(|| anyhow!("no active exercise"))?;
            progress.tick(snapshot.rep_count, &snapshot.feedback);
            if args.json {
                let line = FrameLine {
                    sequence: frame.sequence,
                    event,
                    dropped,
                    snapshot: &snapshot,
                };
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    let stats = frames.stats();
    log::info!(
        "replay finished: {} frames read ({} without pose) from {}",
        stats.frames_read,
        stats.frames_without_pose,
        stats.source
    );

    for summary in session.finish() {
        if args.json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            println!(
                "{} ({}): {} reps over {} frames",
                summary.exercise,
                summary.kind.as_str(),
                summary.reps,
                summary.frames_classified
            );
            println!(
                "  no pose: {}  missing landmarks: {}  low confidence: {}  posture rejected: {}  good hold: {}",
                summary.frames_without_pose,
                summary.frames_missing_landmarks,
                summary.frames_low_confidence,
                summary.frames_posture_rejected,
                summary.frames_hold_correct
            );
        }
    }
    Ok(())
}
