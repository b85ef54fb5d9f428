//! coach_catalog - list the exercises the coach can classify.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use form_coach::catalog::ExerciseRecord;
use form_coach::{CoachConfig, ExerciseMode};

#[derive(Parser, Debug)]
#[command(name = "coach_catalog", about = "List known exercises")]
struct Args {
    /// Extra TOML exercise catalog (overrides COACH_CATALOG_PATH)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Print each exercise as a JSON line instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = CoachConfig::load()?;
    if let Some(path) = args.catalog {
        config.catalog_path = Some(path);
    }
    let catalog = config.catalog()?;

    for def in catalog.iter() {
        if args.json {
            println!("{}", serde_json::to_string(&ExerciseRecord::from(def))?);
            continue;
        }
        let detail = match def.mode() {
            ExerciseMode::RepBased {
                thresholds,
                invert_stages,
            } => format!(
                "up>{:.0} down<{:.0}{}",
                thresholds.up,
                thresholds.down,
                if invert_stages { " inverted" } else { "" }
            ),
            ExerciseMode::Timed { correct_form_angle } => {
                format!("hold>{:.0}", correct_form_angle)
            }
        };
        let guard = def
            .posture_validation()
            .map(|g| format!("  guard<={:.0}", g.angle_threshold))
            .unwrap_or_default();
        println!(
            "{:<16} {:<9} {:?}  {}{}",
            def.name(),
            def.kind().as_str(),
            def.tracked_landmarks(),
            detail,
            guard
        );
    }
    Ok(())
}
