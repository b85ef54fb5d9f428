//! Workout session controller.
//!
//! A `Session` owns the `ClassifierState` of the active exercise and replaces
//! it wholesale whenever the exercise changes. It also turns detector output
//! into classifier calls: a frame without a detected person shows the
//! no-pose message, and a frame missing landmarks is dropped, in both cases
//! without touching rep progress. A run of dropped frames is reported as no
//! pose once it reaches `missing_frames_before_no_pose`.

use serde::Serialize;

use crate::catalog::{ExerciseCatalog, ExerciseDefinition, ExerciseKind};
use crate::classifier::{
    ClassifierState, FrameEvent, FrameOutcome, RepClassifier, Stage, Validity,
    DEFAULT_INITIAL_FEEDBACK,
};
use crate::error::{CoachError, CoachResult};
use crate::geometry::DEFAULT_SEGMENT_EPSILON;
use crate::landmark::LandmarkFrame;

pub const DEFAULT_NO_POSE_FEEDBACK: &str = "No pose detected";
pub const DEFAULT_MISSING_FRAMES_BEFORE_NO_POSE: u32 = 3;

/// Tunables for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub initial_feedback: String,
    pub no_pose_feedback: String,
    /// Consecutive frames with missing landmarks after which the no-pose
    /// message is shown. Zero disables the fallback.
    pub missing_frames_before_no_pose: u32,
    pub segment_epsilon: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_feedback: DEFAULT_INITIAL_FEEDBACK.to_string(),
            no_pose_feedback: DEFAULT_NO_POSE_FEEDBACK.to_string(),
            missing_frames_before_no_pose: DEFAULT_MISSING_FRAMES_BEFORE_NO_POSE,
            segment_epsilon: DEFAULT_SEGMENT_EPSILON,
        }
    }
}

/// Totals for one exercise, produced when it ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub kind: ExerciseKind,
    pub reps: u32,
    pub frames_classified: u64,
    pub frames_without_pose: u64,
    pub frames_missing_landmarks: u64,
    pub frames_low_confidence: u64,
    pub frames_posture_rejected: u64,
    /// Frames held in good form (timed exercises only).
    pub frames_hold_correct: u64,
}

/// Renderer-facing view of the active exercise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub exercise: String,
    pub kind: ExerciseKind,
    /// Absent for timed exercises, which have no stage cycle.
    pub stage: Option<Stage>,
    pub rep_count: u32,
    pub feedback: String,
    pub validity: Validity,
}

struct ActiveExercise<'c> {
    definition: &'c ExerciseDefinition,
    state: ClassifierState,
    summary: ExerciseSummary,
    missing_streak: u32,
}

impl<'c> ActiveExercise<'c> {
    fn start(definition: &'c ExerciseDefinition, settings: &SessionSettings) -> Self {
        Self {
            definition,
            state: ClassifierState::with_feedback(definition, &settings.initial_feedback),
            summary: ExerciseSummary {
                exercise: definition.name().to_string(),
                kind: definition.kind(),
                reps: 0,
                frames_classified: 0,
                frames_without_pose: 0,
                frames_missing_landmarks: 0,
                frames_low_confidence: 0,
                frames_posture_rejected: 0,
                frames_hold_correct: 0,
            },
            missing_streak: 0,
        }
    }

    fn finish(mut self) -> ExerciseSummary {
        self.summary.reps = self.state.rep_count();
        self.summary
    }
}

/// Drives classification for a sequence of exercises, one at a time.
pub struct Session<'c> {
    catalog: &'c ExerciseCatalog,
    classifier: RepClassifier,
    settings: SessionSettings,
    active: Option<ActiveExercise<'c>>,
    completed: Vec<ExerciseSummary>,
}

impl<'c> Session<'c> {
    pub fn new(catalog: &'c ExerciseCatalog) -> Self {
        Self::with_settings(catalog, SessionSettings::default())
    }

    pub fn with_settings(catalog: &'c ExerciseCatalog, settings: SessionSettings) -> Self {
        Self {
            catalog,
            classifier: RepClassifier::with_epsilon(settings.segment_epsilon),
            settings,
            active: None,
            completed: Vec::new(),
        }
    }

    /// Start `name`, ending the current exercise if there is one.
    ///
    /// An unknown name fails with `NotFound` and leaves the current exercise
    /// running. Returns the summary of the exercise that was replaced.
    pub fn begin(&mut self, name: &str) -> CoachResult<Option<ExerciseSummary>> {
        let catalog = self.catalog;
        let definition = catalog.lookup(name)?;
        let next = ActiveExercise::start(definition, &self.settings);
        let replaced = self.active.replace(next).map(|prev| self.retire(prev));
        log::info!(
            "exercise started: {} ({}, resting stage {})",
            definition.name(),
            definition.kind().as_str(),
            Stage::resting(definition.invert_stages())
        );
        Ok(replaced)
    }

    /// End the active exercise early.
    pub fn skip(&mut self) -> CoachResult<ExerciseSummary> {
        let active = self.active.take().ok_or(CoachError::NoActiveExercise)?;
        log::info!("exercise skipped: {}", active.definition.name());
        Ok(self.retire(active))
    }

    /// Classify one frame for the active exercise.
    ///
    /// `MissingLandmarks` is returned to the caller and the frame is counted
    /// as dropped; stage and rep count are left exactly as they were.
    pub fn observe(&mut self, frame: &LandmarkFrame) -> CoachResult<FrameOutcome> {
        let active = self.active.as_mut().ok_or(CoachError::NoActiveExercise)?;
        match self
            .classifier
            .classify(active.definition, &mut active.state, frame)
        {
            Ok(outcome) => {
                active.missing_streak = 0;
                let summary = &mut active.summary;
                summary.frames_classified += 1;
                if outcome.low_confidence() {
                    summary.frames_low_confidence += 1;
                }
                match outcome.event {
                    FrameEvent::PostureRejected => summary.frames_posture_rejected += 1,
                    FrameEvent::HoldCorrect => summary.frames_hold_correct += 1,
                    _ => {}
                }
                Ok(outcome)
            }
            Err(err) => {
                if matches!(err, CoachError::MissingLandmarks { .. }) {
                    active.summary.frames_missing_landmarks += 1;
                    active.missing_streak = active.missing_streak.saturating_add(1);
                    log::warn!("{}: frame dropped: {}", active.definition.name(), err);
                    let limit = self.settings.missing_frames_before_no_pose;
                    if limit > 0 && active.missing_streak >= limit {
                        active
                            .state
                            .show(&self.settings.no_pose_feedback, Validity::Neutral);
                    }
                }
                Err(err)
            }
        }
    }

    /// Record a frame in which the detector found no person.
    pub fn observe_no_pose(&mut self) -> CoachResult<()> {
        let active = self.active.as_mut().ok_or(CoachError::NoActiveExercise)?;
        active
            .state
            .show(&self.settings.no_pose_feedback, Validity::Neutral);
        active.summary.frames_without_pose += 1;
        active.missing_streak = 0;
        Ok(())
    }

    /// Feed raw detector output: `None` when no person was detected.
    pub fn observe_detection(
        &mut self,
        detection: Option<&LandmarkFrame>,
    ) -> CoachResult<Option<FrameOutcome>> {
        match detection {
            Some(frame) => self.observe(frame).map(Some),
            None => self.observe_no_pose().map(|_| None),
        }
    }

    pub fn active_exercise(&self) -> Option<&ExerciseDefinition> {
        self.active.as_ref().map(|active| active.definition)
    }

    pub fn state(&self) -> Option<&ClassifierState> {
        self.active.as_ref().map(|active| &active.state)
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.active.as_ref().map(|active| {
            let kind = active.definition.kind();
            SessionSnapshot {
                exercise: active.definition.name().to_string(),
                kind,
                stage: match kind {
                    ExerciseKind::RepBased => Some(active.state.stage()),
                    ExerciseKind::Timed => None,
                },
                rep_count: active.state.rep_count(),
                feedback: active.state.feedback().to_string(),
                validity: active.state.validity(),
            }
        })
    }

    /// Summaries of exercises that have ended so far.
    pub fn completed(&self) -> &[ExerciseSummary] {
        &self.completed
    }

    /// End the session, returning one summary per exercise in order.
    pub fn finish(mut self) -> Vec<ExerciseSummary> {
        if let Some(active) = self.active.take() {
            self.retire(active);
        }
        self.completed
    }

    fn retire(&mut self, active: ActiveExercise<'c>) -> ExerciseSummary {
        let summary = active.finish();
        log::info!(
            "exercise finished: {} reps={} frames={}",
            summary.exercise,
            summary.reps,
            summary.frames_classified
        );
        self.completed.push(summary.clone());
        summary
    }
}
