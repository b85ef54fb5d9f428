use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, CoachResult};
use crate::landmark::POSE_LANDMARK_COUNT;

/// Which fields of an `ExerciseDefinition` drive classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    RepBased,
    Timed,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::RepBased => "rep_based",
            ExerciseKind::Timed => "timed",
        }
    }
}

// ----------------------------------------------------------------------------
// Feedback
// ----------------------------------------------------------------------------

/// Recognized feedback keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeedbackKey {
    Up,
    Down,
    TransitionUp,
    TransitionDown,
    Correct,
    Incorrect,
}

impl FeedbackKey {
    pub const ALL: [FeedbackKey; 6] = [
        FeedbackKey::Up,
        FeedbackKey::Down,
        FeedbackKey::TransitionUp,
        FeedbackKey::TransitionDown,
        FeedbackKey::Correct,
        FeedbackKey::Incorrect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKey::Up => "up",
            FeedbackKey::Down => "down",
            FeedbackKey::TransitionUp => "transition_up",
            FeedbackKey::TransitionDown => "transition_down",
            FeedbackKey::Correct => "correct",
            FeedbackKey::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for FeedbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown feedback key '{}'", s))
    }
}

/// Display text per feedback key. Lookups for absent keys take a fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackMap {
    entries: BTreeMap<FeedbackKey, String>,
}

impl FeedbackMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(FeedbackKey, &str)]) -> Self {
        let entries = pairs
            .iter()
            .map(|(key, text)| (*key, (*text).to_string()))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, key: FeedbackKey, text: impl Into<String>) {
        self.entries.insert(key, text.into());
    }

    pub fn get(&self, key: FeedbackKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn text_or<'a>(&'a self, key: FeedbackKey, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeedbackKey, &str)> {
        self.entries.iter().map(|(key, text)| (*key, text.as_str()))
    }

    pub(crate) fn to_string_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, text)| (key.as_str().to_string(), text.clone()))
            .collect()
    }

    pub(crate) fn from_string_map(
        name: &str,
        raw: BTreeMap<String, String>,
    ) -> CoachResult<Self> {
        let mut map = Self::new();
        for (key, text) in raw {
            let key = key.parse::<FeedbackKey>().map_err(|reason| {
                CoachError::InvalidDefinition {
                    name: name.to_string(),
                    reason,
                }
            })?;
            map.insert(key, text);
        }
        Ok(map)
    }
}

// ----------------------------------------------------------------------------
// Definition
// ----------------------------------------------------------------------------

/// Guard angle that vetoes rep counting while ancillary alignment is off,
/// e.g. requiring the back to stay bent during a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostureValidation {
    /// `[endpoint, vertex, endpoint]` landmark ids.
    pub landmarks: [usize; 3],
    /// The guard fails while the measured angle is above this many degrees.
    pub angle_threshold: f64,
    /// Feedback shown while the guard fails.
    pub feedback_incorrect: String,
}

impl PostureValidation {
    pub fn new(landmarks: [usize; 3], angle_threshold: f64, feedback_incorrect: &str) -> Self {
        Self {
            landmarks,
            angle_threshold,
            feedback_incorrect: feedback_incorrect.to_string(),
        }
    }
}

/// Angle bounds for rep-based exercises, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageThresholds {
    pub up: f64,
    pub down: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExerciseMode {
    RepBased {
        thresholds: StageThresholds,
        /// When set, `down` is the resting stage and reaching `up` completes a rep.
        invert_stages: bool,
    },
    Timed {
        correct_form_angle: f64,
    },
}

/// Classification configuration of one supported exercise.
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseDefinition {
    name: String,
    tracked_landmarks: [usize; 6],
    mode: ExerciseMode,
    feedback: FeedbackMap,
    posture_validation: Option<PostureValidation>,
}

impl ExerciseDefinition {
    pub fn rep_based(name: &str, tracked_landmarks: [usize; 6], up: f64, down: f64) -> Self {
        Self {
            name: name.to_string(),
            tracked_landmarks,
            mode: ExerciseMode::RepBased {
                thresholds: StageThresholds { up, down },
                invert_stages: false,
            },
            feedback: FeedbackMap::new(),
            posture_validation: None,
        }
    }

    pub fn timed(name: &str, tracked_landmarks: [usize; 6], correct_form_angle: f64) -> Self {
        Self {
            name: name.to_string(),
            tracked_landmarks,
            mode: ExerciseMode::Timed { correct_form_angle },
            feedback: FeedbackMap::new(),
            posture_validation: None,
        }
    }

    /// Make `down` the resting stage. No effect on timed exercises.
    pub fn inverted(mut self) -> Self {
        if let ExerciseMode::RepBased { invert_stages, .. } = &mut self.mode {
            *invert_stages = true;
        }
        self
    }

    pub fn with_feedback(mut self, pairs: &[(FeedbackKey, &str)]) -> Self {
        for (key, text) in pairs {
            self.feedback.insert(*key, *text);
        }
        self
    }

    pub fn with_feedback_map(mut self, feedback: FeedbackMap) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_posture_validation(mut self, guard: PostureValidation) -> Self {
        self.posture_validation = Some(guard);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExerciseKind {
        match self.mode {
            ExerciseMode::RepBased { .. } => ExerciseKind::RepBased,
            ExerciseMode::Timed { .. } => ExerciseKind::Timed,
        }
    }

    pub fn mode(&self) -> ExerciseMode {
        self.mode
    }

    pub fn tracked_landmarks(&self) -> &[usize; 6] {
        &self.tracked_landmarks
    }

    /// Left-side `[endpoint, vertex, endpoint]` triple.
    pub fn triple_a(&self) -> [usize; 3] {
        let t = &self.tracked_landmarks;
        [t[0], t[1], t[2]]
    }

    /// Right-side `[endpoint, vertex, endpoint]` triple.
    pub fn triple_b(&self) -> [usize; 3] {
        let t = &self.tracked_landmarks;
        [t[3], t[4], t[5]]
    }

    pub fn thresholds(&self) -> Option<StageThresholds> {
        match self.mode {
            ExerciseMode::RepBased { thresholds, .. } => Some(thresholds),
            ExerciseMode::Timed { .. } => None,
        }
    }

    pub fn up_threshold(&self) -> Option<f64> {
        self.thresholds().map(|t| t.up)
    }

    pub fn down_threshold(&self) -> Option<f64> {
        self.thresholds().map(|t| t.down)
    }

    pub fn correct_form_angle(&self) -> Option<f64> {
        match self.mode {
            ExerciseMode::Timed { correct_form_angle } => Some(correct_form_angle),
            ExerciseMode::RepBased { .. } => None,
        }
    }

    pub fn invert_stages(&self) -> bool {
        matches!(
            self.mode,
            ExerciseMode::RepBased {
                invert_stages: true,
                ..
            }
        )
    }

    pub fn feedback(&self) -> &FeedbackMap {
        &self.feedback
    }

    pub fn posture_validation(&self) -> Option<&PostureValidation> {
        self.posture_validation.as_ref()
    }

    /// Every landmark id a frame must carry for this exercise.
    pub fn required_landmarks(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.tracked_landmarks.to_vec();
        if let Some(guard) = &self.posture_validation {
            ids.extend_from_slice(&guard.landmarks);
        }
        ids
    }

    /// Check the definition invariants.
    pub fn validate(&self) -> CoachResult<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        match self.mode {
            ExerciseMode::RepBased { thresholds, .. } => {
                if !thresholds.up.is_finite() || !thresholds.down.is_finite() {
                    return Err(self.invalid("thresholds must be finite"));
                }
                if thresholds.up <= thresholds.down {
                    return Err(self.invalid(&format!(
                        "up_threshold ({}) must be greater than down_threshold ({})",
                        thresholds.up, thresholds.down
                    )));
                }
            }
            ExerciseMode::Timed { correct_form_angle } => {
                if !correct_form_angle.is_finite() {
                    return Err(self.invalid("correct_form_angle must be finite"));
                }
            }
        }
        if let Some(guard) = &self.posture_validation {
            if !guard.angle_threshold.is_finite() {
                return Err(self.invalid("posture angle_threshold must be finite"));
            }
        }
        if let Some(id) = self
            .required_landmarks()
            .into_iter()
            .find(|&id| id >= POSE_LANDMARK_COUNT)
        {
            return Err(self.invalid(&format!(
                "landmark id {} is outside the {}-point pose topology",
                id, POSE_LANDMARK_COUNT
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CoachError {
        CoachError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
