use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ExerciseDefinition;

/// Feedback shown before the first frame of an exercise is classified.
pub const DEFAULT_INITIAL_FEEDBACK: &str = "Ready";

/// Discrete phase of a repetition cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Up,
    Down,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Up => "up",
            Stage::Down => "down",
        }
    }

    /// Resting stage for an exercise: `Down` when stages are inverted.
    pub fn resting(invert_stages: bool) -> Self {
        if invert_stages {
            Stage::Down
        } else {
            Stage::Up
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joint-highlight signal for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    /// Resting position reached, or nothing evaluated yet. Rendered orange.
    Neutral,
    /// Rep completed or timed hold in good form. Rendered green.
    Valid,
    /// Mid-transition, failed posture guard, or bad hold. Rendered red.
    Invalid,
}

impl Validity {
    pub fn color_name(&self) -> &'static str {
        match self {
            Validity::Neutral => "orange",
            Validity::Valid => "green",
            Validity::Invalid => "red",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Validity::Neutral => [245, 117, 66],
            Validity::Valid => [0, 255, 0],
            Validity::Invalid => [255, 0, 0],
        }
    }
}

/// Mutable classification state for one active exercise.
///
/// Only the classifier advances it. Callers read it and replace it wholesale
/// when the exercise changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifierState {
    rep_count: u32,
    stage: Stage,
    feedback: String,
    validity: Validity,
}

impl ClassifierState {
    /// Fresh state at the resting stage of `def`.
    pub fn new(def: &ExerciseDefinition) -> Self {
        Self::with_feedback(def, DEFAULT_INITIAL_FEEDBACK)
    }

    pub fn with_feedback(def: &ExerciseDefinition, feedback: &str) -> Self {
        Self {
            rep_count: 0,
            stage: Stage::resting(def.invert_stages()),
            feedback: feedback.to_string(),
            validity: Validity::Neutral,
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn count_rep(&mut self) {
        self.rep_count = self.rep_count.saturating_add(1);
    }

    pub(crate) fn show(&mut self, feedback: &str, validity: Validity) {
        if self.feedback != feedback {
            self.feedback.clear();
            self.feedback.push_str(feedback);
        }
        self.validity = validity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ExerciseCatalog;

    #[test]
    fn initial_stage_follows_inversion() {
        let catalog = ExerciseCatalog::shared();
        let squat = ClassifierState::new(catalog.lookup("SQUAT").unwrap());
        assert_eq!(squat.stage(), Stage::Up);
        assert_eq!(squat.rep_count(), 0);
        assert_eq!(squat.feedback(), "Ready");
        assert_eq!(squat.validity(), Validity::Neutral);

        let push_up = ClassifierState::new(catalog.lookup("PUSH-UP").unwrap());
        assert_eq!(push_up.stage(), Stage::Down);
    }

    #[test]
    fn validity_colors() {
        assert_eq!(Validity::Neutral.rgb(), [245, 117, 66]);
        assert_eq!(Validity::Valid.color_name(), "green");
        assert_eq!(Validity::Invalid.color_name(), "red");
    }
}
