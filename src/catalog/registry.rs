use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;

use super::builtin::reference_exercises;
use super::definition::ExerciseDefinition;
use super::file::read_catalog_file;
use crate::error::{CoachError, CoachResult};

/// Read-only table of exercise definitions addressed by exact name.
///
/// Definitions are stored by value in registration order; the name index
/// points into that arena. Once built the catalog is never mutated, so a
/// shared reference can be handed to any number of sessions or threads.
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseDefinition>,
    index: HashMap<String, usize>,
}

impl ExerciseCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the reference exercise set.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for def in reference_exercises() {
            catalog.insert(def);
        }
        catalog
    }

    /// Process-wide reference catalog, built on first use.
    pub fn shared() -> &'static ExerciseCatalog {
        static SHARED: OnceLock<ExerciseCatalog> = OnceLock::new();
        SHARED.get_or_init(ExerciseCatalog::builtin)
    }

    /// Register a definition after checking its invariants.
    pub fn register(&mut self, def: ExerciseDefinition) -> CoachResult<()> {
        def.validate()?;
        if self.index.contains_key(def.name()) {
            return Err(CoachError::DuplicateExercise(def.name().to_string()));
        }
        self.insert(def);
        Ok(())
    }

    /// Register every exercise from a TOML catalog file. Returns how many
    /// were added. Nothing is registered if any record is rejected.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let defs = read_catalog_file(path)?;
        let mut staged = self.clone();
        for def in defs.iter().cloned() {
            staged.register(def)?;
        }
        *self = staged;
        log::info!(
            "loaded {} exercise(s) from {}",
            defs.len(),
            path.display()
        );
        Ok(defs.len())
    }

    /// Look up an exercise by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> CoachResult<&ExerciseDefinition> {
        self.index
            .get(name)
            .map(|&slot| &self.exercises[slot])
            .ok_or_else(|| CoachError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Exercise names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.exercises.iter().map(ExerciseDefinition::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    fn insert(&mut self, def: ExerciseDefinition) {
        self.index.insert(def.name().to_string(), self.exercises.len());
        self.exercises.push(def);
    }
}
