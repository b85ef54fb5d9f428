//! Exercise catalog.
//!
//! Maps an exercise name to its classification configuration. Behavior is
//! fully data-driven by `ExerciseDefinition` fields; there is no per-exercise
//! code.

pub mod builtin;
mod definition;
mod file;
mod registry;

pub use definition::{
    ExerciseDefinition, ExerciseKind, ExerciseMode, FeedbackKey, FeedbackMap, PostureValidation,
    StageThresholds,
};
pub use file::{parse_catalog_toml, read_catalog_file, ExerciseRecord};
pub use registry::ExerciseCatalog;
