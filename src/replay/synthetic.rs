use anyhow::{anyhow, Result};

use super::{ReplayConfig, ReplayFrame, ReplayStats};
use crate::catalog::{ExerciseCatalog, ExerciseDefinition, ExerciseMode};
use crate::classifier::Stage;
use crate::landmark::{LandmarkFrame, LandmarkPoint, POSE_LANDMARK_COUNT};

const DEFAULT_REPS: u32 = 3;
const SEGMENT_LENGTH: f64 = 0.15;
/// Margin kept below the posture limit so generated frames always pass it.
const GUARD_MARGIN: f64 = 20.0;

/// Synthetic pose sequence for one exercise.
///
/// `stub://SQUAT?reps=3` generates three clean reps at `target_fps`, each a
/// half-second sweep from the resting region to the completion region and
/// back. Underscores in the name stand for spaces (`stub://BENT_OVER_ROW`).
/// For timed exercises `reps` is the hold length in seconds, preceded by
/// half a second out of form.
pub struct SyntheticSource {
    definition: ExerciseDefinition,
    angles: Vec<f64>,
    cursor: usize,
    stats: ReplayStats,
}

impl SyntheticSource {
    pub fn new(config: &ReplayConfig, catalog: &ExerciseCatalog) -> Result<Self> {
        let (name, reps) = parse_stub(&config.source)?;
        let definition = catalog.lookup(&name)?.clone();
        let angles = schedule(&definition, reps, config.target_fps);
        log::info!(
            "SyntheticSource: {} x{} at {} fps ({} frames)",
            definition.name(),
            reps,
            config.target_fps,
            angles.len()
        );
        Ok(Self {
            definition,
            angles,
            cursor: 0,
            stats: ReplayStats {
                source: config.source.clone(),
                ..ReplayStats::default()
            },
        })
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn next_frame(&mut self) -> Option<ReplayFrame> {
        let angle = *self.angles.get(self.cursor)?;
        self.cursor += 1;
        self.stats.frames_read += 1;
        Some(ReplayFrame {
            sequence: self.stats.frames_read,
            detection: Some(synthetic_pose(&self.definition, angle)),
        })
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats.clone()
    }
}

fn parse_stub(source: &str) -> Result<(String, u32)> {
    let rest = source
        .strip_prefix("stub://")
        .ok_or_else(|| anyhow!("not a stub:// source: {}", source))?;
    let (name, query) = match rest.split_once('?') {
        Some((name, query)) => (name, Some(query)),
        None => (rest, None),
    };
    if name.trim().is_empty() {
        return Err(anyhow!("stub:// source needs an exercise name"));
    }

    let mut reps = DEFAULT_REPS;
    for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some(("reps", value)) => {
                reps = value
                    .parse()
                    .map_err(|_| anyhow!("stub:// reps must be a non-negative integer"))?;
            }
            _ => return Err(anyhow!("unknown stub:// parameter: {}", pair)),
        }
    }
    Ok((name.replace('_', " "), reps))
}

/// Primary joint angle per frame.
fn schedule(def: &ExerciseDefinition, reps: u32, fps: u32) -> Vec<f64> {
    let fps = fps.max(1) as usize;
    match def.mode() {
        ExerciseMode::RepBased {
            thresholds,
            invert_stages,
        } => {
            let up = (thresholds.up + 180.0) / 2.0;
            let down = thresholds.down / 2.0;
            let (rest, completion) = match Stage::resting(invert_stages) {
                Stage::Up => (up, down),
                Stage::Down => (down, up),
            };
            let half = (fps / 2).max(2);
            let mut angles = vec![rest; (fps / 4).max(1)];
            for _ in 0..reps {
                angles.extend(sweep(rest, completion, half));
                angles.extend(sweep(completion, rest, half));
            }
            angles
        }
        ExerciseMode::Timed { correct_form_angle } => {
            let mut angles = vec![correct_form_angle / 2.0; (fps / 2).max(1)];
            let hold = (correct_form_angle + 180.0) / 2.0;
            angles.extend(std::iter::repeat(hold).take(reps as usize * fps));
            angles
        }
    }
}

/// `steps` frames moving from just past `from` to exactly `to`.
fn sweep(from: f64, to: f64, steps: usize) -> impl Iterator<Item = f64> {
    (1..=steps).map(move |i| from + (to - from) * i as f64 / steps as f64)
}

/// A pose in which both primary joints of `def` bend to `angle` degrees and
/// the posture guard, if any, sits comfortably inside its limit.
pub fn synthetic_pose(def: &ExerciseDefinition, angle: f64) -> LandmarkFrame {
    pose_with_angles(def, angle, angle, None)
}

/// A pose with the left and right primary angles set independently.
/// `guard_angle` overrides the posture guard angle; by default it sits
/// `GUARD_MARGIN` degrees inside the limit.
pub fn pose_with_angles(
    def: &ExerciseDefinition,
    angle_a: f64,
    angle_b: f64,
    guard_angle: Option<f64>,
) -> LandmarkFrame {
    let len = def
        .required_landmarks()
        .into_iter()
        .map(|index| index.saturating_add(1))
        .max()
        .unwrap_or(0)
        .max(POSE_LANDMARK_COUNT);
    let mut placed: Vec<Option<LandmarkPoint>> = vec![None; len];

    // Guard first: its joints are often shared with a primary triple.
    if let Some(guard) = def.posture_validation() {
        let angle = guard_angle.unwrap_or((guard.angle_threshold - GUARD_MARGIN).max(0.0));
        place_triple(&mut placed, guard.landmarks, (0.5, 0.2), angle);
    }
    place_triple(&mut placed, def.triple_a(), (0.3, 0.3), angle_a);
    place_triple(&mut placed, def.triple_b(), (0.7, 0.3), angle_b);

    LandmarkFrame::new(placed.into_iter().map(Option::unwrap_or_default).collect())
}

/// Place `[a, vertex, c]` so the angle at `vertex` is `angle`, reusing any
/// point that is already placed.
fn place_triple(
    placed: &mut [Option<LandmarkPoint>],
    [a, vertex, c]: [usize; 3],
    anchor: (f64, f64),
    angle: f64,
) {
    let a_pos = *placed[a].get_or_insert(LandmarkPoint::new(anchor.0 as f32, anchor.1 as f32));
    let v_pos = *placed[vertex].get_or_insert(LandmarkPoint::new(
        a_pos.x,
        a_pos.y + SEGMENT_LENGTH as f32,
    ));

    let (dx, dy) = ((a_pos.x - v_pos.x) as f64, (a_pos.y - v_pos.y) as f64);
    let norm = dx.hypot(dy);
    let (ux, uy) = if norm > 0.0 {
        (dx / norm, dy / norm)
    } else {
        (0.0, -1.0)
    };
    let (sin, cos) = angle.to_radians().sin_cos();
    let (rx, ry) = (ux * cos - uy * sin, ux * sin + uy * cos);
    placed[c] = Some(LandmarkPoint::new(
        (v_pos.x as f64 + SEGMENT_LENGTH * rx) as f32,
        (v_pos.y as f64 + SEGMENT_LENGTH * ry) as f32,
    ));
}
