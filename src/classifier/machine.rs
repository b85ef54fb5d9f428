use serde::Serialize;

use super::state::{ClassifierState, Stage, Validity};
use crate::catalog::{ExerciseDefinition, ExerciseMode, FeedbackKey, StageThresholds};
use crate::error::CoachResult;
use crate::geometry::{triple_angle, AngleReading, DEFAULT_SEGMENT_EPSILON};
use crate::landmark::LandmarkFrame;

/// What a single frame did to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameEvent {
    /// Posture guard failed; stage and rep count untouched.
    PostureRejected,
    /// Resting region reached.
    Rest,
    /// Completion region reached from the resting stage; one rep counted.
    RepCompleted,
    /// Between thresholds, or completion region without passing through rest.
    Transition,
    /// Timed hold in good form.
    HoldCorrect,
    /// Timed hold out of form.
    HoldIncorrect,
}

/// Per-frame measurements and the event they produced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub event: FrameEvent,
    /// Guard angle, when the exercise has a posture guard.
    pub guard_angle: Option<AngleReading>,
    /// Left and right primary angles. Absent when the guard vetoed the frame.
    pub angles: Option<[AngleReading; 2]>,
}

impl FrameOutcome {
    pub fn rep_completed(&self) -> bool {
        self.event == FrameEvent::RepCompleted
    }

    /// True when any measured angle came from collapsed geometry.
    pub fn low_confidence(&self) -> bool {
        let guard = self.guard_angle.is_some_and(|a| a.low_confidence);
        let primary = self
            .angles
            .is_some_and(|[a, b]| a.low_confidence || b.low_confidence);
        guard || primary
    }
}

// ----------------------------------------------------------------------------
// Direction table
// ----------------------------------------------------------------------------

/// Stage roles for one direction of travel. Non-inverted exercises rest at
/// `Up` and complete at `Down`; inverted ones swap the roles. Both run through
/// the same transition code.
#[derive(Clone, Copy, Debug)]
struct Direction {
    rest: Stage,
    completion: Stage,
}

impl Direction {
    fn for_definition(def: &ExerciseDefinition) -> Self {
        let rest = Stage::resting(def.invert_stages());
        let completion = match rest {
            Stage::Up => Stage::Down,
            Stage::Down => Stage::Up,
        };
        Self { rest, completion }
    }
}

/// Both angles strictly past the threshold guarding `stage`.
fn in_region(stage: Stage, thresholds: StageThresholds, a: f64, b: f64) -> bool {
    match stage {
        Stage::Up => a > thresholds.up && b > thresholds.up,
        Stage::Down => a < thresholds.down && b < thresholds.down,
    }
}

fn stage_key(stage: Stage) -> FeedbackKey {
    match stage {
        Stage::Up => FeedbackKey::Up,
        Stage::Down => FeedbackKey::Down,
    }
}

/// Feedback key and fallback text coaching the user away from `stage`.
fn transition_from(stage: Stage) -> (FeedbackKey, &'static str) {
    match stage {
        Stage::Up => (FeedbackKey::TransitionDown, "Go Down"),
        Stage::Down => (FeedbackKey::TransitionUp, "Go Up"),
    }
}

const REST_FALLBACK: &str = "Ready";
const REP_FALLBACK: &str = "Good Rep";
const HOLD_CORRECT_FALLBACK: &str = "Good Form";
const HOLD_INCORRECT_FALLBACK: &str = "Adjust Form";

// ----------------------------------------------------------------------------
// RepClassifier
// ----------------------------------------------------------------------------

/// Per-frame repetition and form classifier.
///
/// Stateless apart from its geometry tolerance; all progress lives in the
/// `ClassifierState` passed to `classify`. A call never blocks and performs
/// no I/O.
#[derive(Clone, Copy, Debug)]
pub struct RepClassifier {
    epsilon: f64,
}

impl Default for RepClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RepClassifier {
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_SEGMENT_EPSILON,
        }
    }

    /// Minimum segment length below which an angle is reported low-confidence.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Classify one frame for `def`, advancing `state`.
    ///
    /// Fails with `MissingLandmarks` before touching `state` if the frame
    /// lacks any landmark the definition references.
    pub fn classify(
        &self,
        def: &ExerciseDefinition,
        state: &mut ClassifierState,
        frame: &LandmarkFrame,
    ) -> CoachResult<FrameOutcome> {
        frame.require(&def.required_landmarks())?;

        let guard_angle = match def.posture_validation() {
            Some(guard) => {
                let reading = triple_angle(frame.triple(guard.landmarks)?, self.epsilon);
                if reading.degrees > guard.angle_threshold {
                    state.show(&guard.feedback_incorrect, Validity::Invalid);
                    log::debug!(
                        "{}: posture guard failed at {:.1}° (limit {:.1}°)",
                        def.name(),
                        reading.degrees,
                        guard.angle_threshold
                    );
                    let outcome = FrameOutcome {
                        event: FrameEvent::PostureRejected,
                        guard_angle: Some(reading),
                        angles: None,
                    };
                    warn_low_confidence(def, &outcome);
                    return Ok(outcome);
                }
                Some(reading)
            }
            None => None,
        };

        let angle_a = triple_angle(frame.triple(def.triple_a())?, self.epsilon);
        let angle_b = triple_angle(frame.triple(def.triple_b())?, self.epsilon);

        let event = match def.mode() {
            ExerciseMode::RepBased { thresholds, .. } => advance_reps(
                def,
                state,
                thresholds,
                angle_a.degrees,
                angle_b.degrees,
            ),
            ExerciseMode::Timed { correct_form_angle } => {
                evaluate_hold(def, state, correct_form_angle, angle_a.degrees, angle_b.degrees)
            }
        };

        let outcome = FrameOutcome {
            event,
            guard_angle,
            angles: Some([angle_a, angle_b]),
        };
        warn_low_confidence(def, &outcome);
        Ok(outcome)
    }
}

fn advance_reps(
    def: &ExerciseDefinition,
    state: &mut ClassifierState,
    thresholds: StageThresholds,
    a: f64,
    b: f64,
) -> FrameEvent {
    let direction = Direction::for_definition(def);
    let feedback = def.feedback();

    if in_region(direction.rest, thresholds, a, b) {
        state.set_stage(direction.rest);
        state.show(
            feedback.text_or(stage_key(direction.rest), REST_FALLBACK),
            Validity::Neutral,
        );
        FrameEvent::Rest
    } else if in_region(direction.completion, thresholds, a, b) && state.stage() == direction.rest
    {
        state.set_stage(direction.completion);
        state.count_rep();
        state.show(
            feedback.text_or(stage_key(direction.completion), REP_FALLBACK),
            Validity::Valid,
        );
        log::debug!(
            "{}: rep {} completed ({:.1}°, {:.1}°)",
            def.name(),
            state.rep_count(),
            a,
            b
        );
        FrameEvent::RepCompleted
    } else {
        let (key, fallback) = transition_from(state.stage());
        state.show(feedback.text_or(key, fallback), Validity::Invalid);
        FrameEvent::Transition
    }
}

fn evaluate_hold(
    def: &ExerciseDefinition,
    state: &mut ClassifierState,
    correct_form_angle: f64,
    a: f64,
    b: f64,
) -> FrameEvent {
    let feedback = def.feedback();
    if a > correct_form_angle && b > correct_form_angle {
        state.show(
            feedback.text_or(FeedbackKey::Correct, HOLD_CORRECT_FALLBACK),
            Validity::Valid,
        );
        FrameEvent::HoldCorrect
    } else {
        state.show(
            feedback.text_or(FeedbackKey::Incorrect, HOLD_INCORRECT_FALLBACK),
            Validity::Invalid,
        );
        FrameEvent::HoldIncorrect
    }
}

fn warn_low_confidence(def: &ExerciseDefinition, outcome: &FrameOutcome) {
    if outcome.low_confidence() {
        log::warn!(
            "{}: collapsed joint segment, angle reported as 0° (low confidence)",
            def.name()
        );
    }
}
