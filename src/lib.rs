//! Form Coach
//!
//! Exercise repetition counting and form feedback from 2D pose landmarks.
//!
//! # Architecture
//!
//! Each frame from a pose detector is a list of normalized landmarks. The
//! coach turns it into feedback in three steps:
//!
//! 1. **Catalog**: the active exercise names six tracked landmarks (two
//!    joint triples), its angle thresholds, feedback texts and an optional
//!    posture guard.
//! 2. **Geometry**: the interior angle at the middle joint of each triple.
//! 3. **Classification**: a two-stage machine counts a rep on each move from
//!    the resting region into the completion region, or for timed holds
//!    reports whether form is held.
//!
//! # Module Structure
//!
//! - `landmark`: landmark ids, points and frames
//! - `geometry`: joint angle calculation
//! - `catalog`: exercise definitions, built-ins and TOML catalog files
//! - `classifier`: per-exercise state and the frame classifier
//! - `session`: exercise switching, no-pose handling and summaries
//! - `replay`: recorded and synthetic pose streams
//! - `config`: `COACH_*` configuration

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmark;
pub mod replay;
pub mod session;

pub use catalog::{
    ExerciseCatalog, ExerciseDefinition, ExerciseKind, ExerciseMode, FeedbackKey, FeedbackMap,
    PostureValidation, StageThresholds,
};
pub use classifier::{
    ClassifierState, FrameEvent, FrameOutcome, RepClassifier, Stage, Validity,
    DEFAULT_INITIAL_FEEDBACK,
};
pub use config::CoachConfig;
pub use error::{CoachError, CoachResult};
pub use geometry::{compute_angle, compute_angle_with_epsilon, AngleReading};
pub use landmark::{LandmarkFrame, LandmarkPoint};
pub use replay::{ReplayConfig, ReplayFrame, ReplaySource, ReplayStats};
pub use session::{
    ExerciseSummary, Session, SessionSettings, SessionSnapshot, DEFAULT_NO_POSE_FEEDBACK,
};
