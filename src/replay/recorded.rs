use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use super::{ReplayFrame, ReplayStats};
use crate::landmark::{LandmarkFrame, LandmarkPoint};

/// One line of a recording: `{"landmarks": [[x, y], ...]}`, or
/// `{"landmarks": null}` when the detector found nobody.
#[derive(Deserialize)]
struct RecordedLine {
    landmarks: Option<Vec<LandmarkPoint>>,
}

/// JSON-lines recording of detector output. Blank lines are skipped.
pub struct RecordedSource {
    path: String,
    lines: Lines<BufReader<File>>,
    line_no: u64,
    stats: ReplayStats,
}

impl RecordedSource {
    pub fn open(path: &str) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow!("failed to open recording {}: {}", path, e))?;
        log::info!("RecordedSource: reading {}", path);
        Ok(Self {
            path: path.to_string(),
            lines: BufReader::new(file).lines(),
            line_no: 0,
            stats: ReplayStats {
                source: path.to_string(),
                ..ReplayStats::default()
            },
        })
    }

    pub fn next_frame(&mut self) -> Result<Option<ReplayFrame>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line =
                line.map_err(|e| anyhow!("{}:{}: read failed: {}", self.path, self.line_no, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecordedLine = serde_json::from_str(&line)
                .map_err(|e| anyhow!("{}:{}: invalid frame: {}", self.path, self.line_no, e))?;

            self.stats.frames_read += 1;
            let detection = record.landmarks.map(LandmarkFrame::new);
            if detection.is_none() {
                self.stats.frames_without_pose += 1;
            }
            return Ok(Some(ReplayFrame {
                sequence: self.stats.frames_read,
                detection,
            }));
        }
        Ok(None)
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats.clone()
    }
}
