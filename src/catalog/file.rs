//! On-disk exercise records.
//!
//! Extra exercises are loaded from a TOML file of `[[exercise]]` tables:
//!
//! ```toml
//! [[exercise]]
//! name = "WALL SIT"
//! kind = "timed"
//! landmarks = [23, 25, 27, 24, 26, 28]
//! correct_form_angle = 100.0
//!
//! [exercise.feedback]
//! correct = "Hold It"
//! incorrect = "Sit Lower"
//! ```
//!
//! Records are converted into validated `ExerciseDefinition`s; any field that
//! does not belong to the record's kind is rejected rather than ignored.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::definition::{
    ExerciseDefinition, ExerciseKind, ExerciseMode, FeedbackMap, PostureValidation,
};
use crate::error::{CoachError, CoachResult};

/// Flat, serializable form of an `ExerciseDefinition`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseRecord {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ExerciseKind,
    pub landmarks: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_form_angle: Option<f64>,
    #[serde(default)]
    pub invert_stages: bool,
    #[serde(default)]
    pub feedback: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture_validation: Option<PostureValidation>,
}

fn default_kind() -> ExerciseKind {
    ExerciseKind::RepBased
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    exercise: Vec<ExerciseRecord>,
}

impl From<&ExerciseDefinition> for ExerciseRecord {
    fn from(def: &ExerciseDefinition) -> Self {
        let (up_threshold, down_threshold, correct_form_angle) = match def.mode() {
            ExerciseMode::RepBased { thresholds, .. } => {
                (Some(thresholds.up), Some(thresholds.down), None)
            }
            ExerciseMode::Timed { correct_form_angle } => (None, None, Some(correct_form_angle)),
        };
        Self {
            name: def.name().to_string(),
            kind: def.kind(),
            landmarks: def.tracked_landmarks().to_vec(),
            up_threshold,
            down_threshold,
            correct_form_angle,
            invert_stages: def.invert_stages(),
            feedback: def.feedback().to_string_map(),
            posture_validation: def.posture_validation().cloned(),
        }
    }
}

impl TryFrom<ExerciseRecord> for ExerciseDefinition {
    type Error = CoachError;

    fn try_from(record: ExerciseRecord) -> CoachResult<Self> {
        let invalid = |reason: String| CoachError::InvalidDefinition {
            name: record.name.clone(),
            reason,
        };

        let landmarks: [usize; 6] = record.landmarks.as_slice().try_into().map_err(|_| {
            invalid(format!(
                "expected exactly 6 tracked landmarks, got {}",
                record.landmarks.len()
            ))
        })?;

        let base = match record.kind {
            ExerciseKind::RepBased => {
                if record.correct_form_angle.is_some() {
                    return Err(invalid(
                        "correct_form_angle only applies to timed exercises".to_string(),
                    ));
                }
                let up = record
                    .up_threshold
                    .ok_or_else(|| invalid("up_threshold is required".to_string()))?;
                let down = record
                    .down_threshold
                    .ok_or_else(|| invalid("down_threshold is required".to_string()))?;
                let def = ExerciseDefinition::rep_based(&record.name, landmarks, up, down);
                if record.invert_stages {
                    def.inverted()
                } else {
                    def
                }
            }
            ExerciseKind::Timed => {
                if record.up_threshold.is_some() || record.down_threshold.is_some() {
                    return Err(invalid(
                        "stage thresholds only apply to rep-based exercises".to_string(),
                    ));
                }
                if record.invert_stages {
                    return Err(invalid(
                        "invert_stages only applies to rep-based exercises".to_string(),
                    ));
                }
                let angle = record
                    .correct_form_angle
                    .ok_or_else(|| invalid("correct_form_angle is required".to_string()))?;
                ExerciseDefinition::timed(&record.name, landmarks, angle)
            }
        };

        let feedback = FeedbackMap::from_string_map(&record.name, record.feedback)?;
        let mut def = base.with_feedback_map(feedback);
        if let Some(guard) = record.posture_validation {
            def = def.with_posture_validation(guard);
        }
        def.validate()?;
        Ok(def)
    }
}

/// Parse a TOML catalog document into validated definitions.
pub fn parse_catalog_toml(raw: &str) -> Result<Vec<ExerciseDefinition>> {
    let file: CatalogFile =
        toml::from_str(raw).map_err(|e| anyhow!("invalid exercise catalog: {}", e))?;
    file.exercise
        .into_iter()
        .map(|record| ExerciseDefinition::try_from(record).map_err(anyhow::Error::from))
        .collect()
}

/// Read and parse a TOML catalog file.
pub fn read_catalog_file(path: &Path) -> Result<Vec<ExerciseDefinition>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read exercise catalog {}: {}", path.display(), e))?;
    parse_catalog_toml(&raw).map_err(|e| anyhow!("{}: {}", path.display(), e))
}
