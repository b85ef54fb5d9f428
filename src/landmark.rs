//! Pose landmark frames.
//!
//! The external pose detector hands over one `LandmarkFrame` per processed
//! camera frame: a list of normalized `(x, y)` points indexed by landmark id.
//! Ids follow the MediaPipe Pose 33-point topology (see `POSE_LANDMARK_COUNT`
//! and the constants below).
//!
//! Frames are immutable once built. The classifier only reads them, and a
//! lookup of an id the frame does not carry is reported as
//! `CoachError::MissingLandmarks` rather than panicking.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, CoachResult};

// ----------------------------------------------------------------------------
// Landmark indices (MediaPipe Pose)
// ----------------------------------------------------------------------------

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ----------------------------------------------------------------------------
// LandmarkPoint
// ----------------------------------------------------------------------------

/// A single 2D landmark in normalized image coordinates.
///
/// The conventional range is `[0, 1]` but it is not enforced; detectors
/// report points slightly outside the image when a joint is cut off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for LandmarkPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Wire shapes accepted for a point: `[x, y]`, `[x, y, z, ...]` (extra
/// components such as depth or visibility are dropped) or `{"x": .., "y": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Components(Vec<f32>),
    Named { x: f32, y: f32 },
}

impl TryFrom<RawPoint> for LandmarkPoint {
    type Error = String;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        match raw {
            RawPoint::Components(values) => match values.as_slice() {
                [x, y, ..] => Ok(Self::new(*x, *y)),
                _ => Err(format!(
                    "landmark needs at least 2 components, got {}",
                    values.len()
                )),
            },
            RawPoint::Named { x, y } => Ok(Self::new(x, y)),
        }
    }
}

// ----------------------------------------------------------------------------
// LandmarkFrame
// ----------------------------------------------------------------------------

/// All landmarks detected for one person in one video frame, indexed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: Vec<LandmarkPoint>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Build a full 33-point frame from sparse `(id, point)` pairs. Ids that
    /// are not given sit at the origin.
    pub fn from_sparse(entries: &[(usize, LandmarkPoint)]) -> Self {
        let len = entries
            .iter()
            .map(|(index, _)| index.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(POSE_LANDMARK_COUNT);
        let mut points = vec![LandmarkPoint::default(); len];
        for (index, point) in entries {
            points[*index] = *point;
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    /// Landmark by id.
    pub fn get(&self, index: usize) -> CoachResult<LandmarkPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or(CoachError::MissingLandmarks {
                index,
                available: self.points.len(),
            })
    }

    /// Check that every id in `indices` is present.
    ///
    /// Reports the first missing id so callers can fail before touching any
    /// state.
    pub fn require(&self, indices: &[usize]) -> CoachResult<()> {
        match indices.iter().find(|&&index| index >= self.points.len()) {
            Some(&index) => Err(CoachError::MissingLandmarks {
                index,
                available: self.points.len(),
            }),
            None => Ok(()),
        }
    }

    /// Resolve a `[vertex-side, vertex, far-side]` triple of ids to points.
    pub fn triple(&self, indices: [usize; 3]) -> CoachResult<[LandmarkPoint; 3]> {
        Ok([
            self.get(indices[0])?,
            self.get(indices[1])?,
            self.get(indices[2])?,
        ])
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkFrame {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_reports_missing_landmark() {
        let frame = LandmarkFrame::new(vec![LandmarkPoint::new(0.1, 0.2); 12]);
        assert_eq!(frame.get(11).unwrap(), LandmarkPoint::new(0.1, 0.2));
        assert_eq!(
            frame.get(LEFT_HIP),
            Err(CoachError::MissingLandmarks {
                index: LEFT_HIP,
                available: 12
            })
        );
    }

    #[test]
    fn require_finds_first_missing_id() {
        let frame = LandmarkFrame::new(vec![LandmarkPoint::default(); 20]);
        assert!(frame.require(&[LEFT_SHOULDER, LEFT_ELBOW]).is_ok());
        let err = frame
            .require(&[LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE])
            .unwrap_err();
        assert_eq!(
            err,
            CoachError::MissingLandmarks {
                index: LEFT_HIP,
                available: 20
            }
        );
    }

    #[test]
    fn sparse_frame_covers_pose_topology() {
        let frame = LandmarkFrame::from_sparse(&[(LEFT_KNEE, LandmarkPoint::new(0.4, 0.6))]);
        assert_eq!(frame.len(), POSE_LANDMARK_COUNT);
        assert_eq!(frame.get(LEFT_KNEE).unwrap(), LandmarkPoint::new(0.4, 0.6));
        assert_eq!(frame.get(NOSE).unwrap(), LandmarkPoint::default());
    }

    #[test]
    fn deserializes_mixed_point_shapes() -> anyhow::Result<()> {
        let frame: LandmarkFrame = serde_json::from_str(
            r#"{"points": [[0.1, 0.2], [0.3, 0.4, -0.2, 0.99], {"x": 0.5, "y": 0.6}]}"#,
        )?;
        assert_eq!(
            frame.points(),
            &[
                LandmarkPoint::new(0.1, 0.2),
                LandmarkPoint::new(0.3, 0.4),
                LandmarkPoint::new(0.5, 0.6)
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_short_point() {
        let result: Result<LandmarkFrame, _> = serde_json::from_str(r#"{"points": [[0.1]]}"#);
        assert!(result.is_err());
    }
}
