use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::ExerciseCatalog;
use crate::classifier::DEFAULT_INITIAL_FEEDBACK;
use crate::geometry::DEFAULT_SEGMENT_EPSILON;
use crate::session::{
    SessionSettings, DEFAULT_MISSING_FRAMES_BEFORE_NO_POSE, DEFAULT_NO_POSE_FEEDBACK,
};

const DEFAULT_TARGET_FPS: u32 = 30;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CoachConfigFile {
    catalog_path: Option<PathBuf>,
    feedback: Option<FeedbackConfigFile>,
    geometry: Option<GeometryConfigFile>,
    replay: Option<ReplayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FeedbackConfigFile {
    initial: Option<String>,
    no_pose: Option<String>,
    missing_frames_before_no_pose: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct GeometryConfigFile {
    segment_epsilon: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ReplayConfigFile {
    target_fps: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Optional TOML file of extra exercises registered after the built-ins.
    pub catalog_path: Option<PathBuf>,
    pub session: SessionSettings,
    /// Frame rate of synthetic replay sequences.
    pub target_fps: u32,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            session: SessionSettings::default(),
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl CoachConfig {
    /// Load from the JSON file named by `COACH_CONFIG` (if set), then apply
    /// `COACH_*` environment overrides and validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("COACH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: CoachConfigFile) -> Self {
        let feedback = file.feedback.unwrap_or_default();
        let session = SessionSettings {
            initial_feedback: feedback
                .initial
                .unwrap_or_else(|| DEFAULT_INITIAL_FEEDBACK.to_string()),
            no_pose_feedback: feedback
                .no_pose
                .unwrap_or_else(|| DEFAULT_NO_POSE_FEEDBACK.to_string()),
            missing_frames_before_no_pose: feedback
                .missing_frames_before_no_pose
                .unwrap_or(DEFAULT_MISSING_FRAMES_BEFORE_NO_POSE),
            segment_epsilon: file
                .geometry
                .and_then(|geometry| geometry.segment_epsilon)
                .unwrap_or(DEFAULT_SEGMENT_EPSILON),
        };
        Self {
            catalog_path: file.catalog_path,
            session,
            target_fps: file
                .replay
                .and_then(|replay| replay.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("COACH_CATALOG_PATH") {
            if !path.trim().is_empty() {
                self.catalog_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(text) = std::env::var("COACH_INITIAL_FEEDBACK") {
            if !text.trim().is_empty() {
                self.session.initial_feedback = text;
            }
        }
        if let Ok(text) = std::env::var("COACH_NO_POSE_FEEDBACK") {
            if !text.trim().is_empty() {
                self.session.no_pose_feedback = text;
            }
        }
        if let Ok(frames) = std::env::var("COACH_MISSING_FRAMES_BEFORE_NO_POSE") {
            self.session.missing_frames_before_no_pose = frames.trim().parse().map_err(|_| {
                anyhow!("COACH_MISSING_FRAMES_BEFORE_NO_POSE must be a non-negative integer")
            })?;
        }
        if let Ok(epsilon) = std::env::var("COACH_SEGMENT_EPSILON") {
            self.session.segment_epsilon = epsilon
                .trim()
                .parse()
                .map_err(|_| anyhow!("COACH_SEGMENT_EPSILON must be a number"))?;
        }
        if let Ok(fps) = std::env::var("COACH_TARGET_FPS") {
            self.target_fps = fps
                .trim()
                .parse()
                .map_err(|_| anyhow!("COACH_TARGET_FPS must be an integer frame rate"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let epsilon = self.session.segment_epsilon;
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(anyhow!("segment_epsilon must be a positive number"));
        }
        if self.target_fps == 0 {
            return Err(anyhow!("target_fps must be greater than zero"));
        }
        if self.session.no_pose_feedback.trim().is_empty() {
            return Err(anyhow!("no-pose feedback must not be empty"));
        }
        Ok(())
    }

    /// Built-in exercises plus those from `catalog_path`.
    pub fn catalog(&self) -> Result<ExerciseCatalog> {
        let mut catalog = ExerciseCatalog::builtin();
        if let Some(path) = &self.catalog_path {
            catalog.extend_from_file(path)?;
        }
        Ok(catalog)
    }
}

fn read_config_file(path: &Path) -> Result<CoachConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
