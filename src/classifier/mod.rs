//! Repetition and form classifier.
//!
//! One call per pose frame: posture guard, two primary joint angles, then a
//! small stage machine. All progress lives in `ClassifierState`, which the
//! caller owns and passes in.

mod machine;
mod state;

pub use machine::{FrameEvent, FrameOutcome, RepClassifier};
pub use state::{ClassifierState, Stage, Validity, DEFAULT_INITIAL_FEEDBACK};
