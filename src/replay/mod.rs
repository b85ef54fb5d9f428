//! Pose frame sources for offline replay.
//!
//! Live frames come from an external pose detector. For demos, tests and
//! regression runs this module provides the same stream from:
//! - recorded JSON-lines files (one detector result per line)
//! - synthetic `stub://<EXERCISE>?reps=N` sequences
//!
//! Every source yields `ReplayFrame`s in arrival order. A frame with no
//! detected person carries `detection: None`.

mod recorded;
mod synthetic;

use anyhow::{anyhow, Result};

use crate::catalog::ExerciseCatalog;
use crate::landmark::LandmarkFrame;

pub use recorded::RecordedSource;
pub use synthetic::{pose_with_angles, synthetic_pose, SyntheticSource};

/// Configuration for a replay source.
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Local file path, or `stub://<EXERCISE>?reps=N` for a synthetic sweep.
    pub source: String,
    /// Frame rate used to pace synthetic sequences.
    pub target_fps: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            target_fps: 30,
        }
    }
}

/// One detector result.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayFrame {
    /// 1-based position in the stream.
    pub sequence: u64,
    pub detection: Option<LandmarkFrame>,
}

/// Statistics for a replay source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames_read: u64,
    pub frames_without_pose: u64,
    pub source: String,
}

/// Replay frame source.
pub struct ReplaySource {
    backend: ReplayBackend,
}

enum ReplayBackend {
    Recorded(RecordedSource),
    Synthetic(SyntheticSource),
}

impl ReplaySource {
    pub fn new(config: ReplayConfig, catalog: &ExerciseCatalog) -> Result<Self> {
        if !is_local_source(&config.source) {
            return Err(anyhow!(
                "replay only supports local paths or stub:// sources (no URL schemes)"
            ));
        }
        if config.target_fps == 0 {
            return Err(anyhow!("target_fps must be >= 1"));
        }
        let backend = if config.source.starts_with("stub://") {
            ReplayBackend::Synthetic(SyntheticSource::new(&config, catalog)?)
        } else {
            ReplayBackend::Recorded(RecordedSource::open(&config.source)?)
        };
        Ok(Self { backend })
    }

    /// Next frame, or `None` once the source is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<ReplayFrame>> {
        match &mut self.backend {
            ReplayBackend::Recorded(source) => source.next_frame(),
            ReplayBackend::Synthetic(source) => Ok(source.next_frame()),
        }
    }

    /// Total frame count when known up front.
    pub fn len_hint(&self) -> Option<u64> {
        match &self.backend {
            ReplayBackend::Recorded(_) => None,
            ReplayBackend::Synthetic(source) => Some(source.len() as u64),
        }
    }

    pub fn stats(&self) -> ReplayStats {
        match &self.backend {
            ReplayBackend::Recorded(source) => source.stats(),
            ReplayBackend::Synthetic(source) => source.stats(),
        }
    }
}

impl Iterator for ReplaySource {
    type Item = Result<ReplayFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

fn is_local_source(source: &str) -> bool {
    if source.trim().is_empty() {
        return false;
    }
    if source.starts_with("stub://") {
        return true;
    }
    !source.contains("://")
}
