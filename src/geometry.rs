//! Joint angle calculation.
//!
//! The angle at a joint is the interior angle between the two limb segments
//! meeting at it, from the dot product of the segment vectors:
//! `cos(θ) = (v1 · v2) / (|v1| × |v2|)`.

use serde::Serialize;

use crate::landmark::LandmarkPoint;

/// Segments shorter than this (in normalized image units) are treated as
/// collapsed.
pub const DEFAULT_SEGMENT_EPSILON: f64 = 1e-6;

/// Result of one angle measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AngleReading {
    /// Interior angle in degrees, always within `[0, 180]`.
    pub degrees: f64,
    /// Set when a segment collapsed and `degrees` is the fallback value.
    pub low_confidence: bool,
}

impl AngleReading {
    fn degenerate() -> Self {
        Self {
            degrees: 0.0,
            low_confidence: true,
        }
    }
}

/// Interior angle at `vertex` formed by rays `vertex→a` and `vertex→c`.
///
/// A collapsed segment (two coincident landmarks) yields `0°` with
/// `low_confidence` set instead of NaN.
pub fn compute_angle(a: LandmarkPoint, vertex: LandmarkPoint, c: LandmarkPoint) -> AngleReading {
    compute_angle_with_epsilon(a, vertex, c, DEFAULT_SEGMENT_EPSILON)
}

/// `compute_angle` with an explicit minimum segment length.
pub fn compute_angle_with_epsilon(
    a: LandmarkPoint,
    vertex: LandmarkPoint,
    c: LandmarkPoint,
    epsilon: f64,
) -> AngleReading {
    let v1 = (
        f64::from(a.x) - f64::from(vertex.x),
        f64::from(a.y) - f64::from(vertex.y),
    );
    let v2 = (
        f64::from(c.x) - f64::from(vertex.x),
        f64::from(c.y) - f64::from(vertex.y),
    );

    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);
    // Non-finite magnitudes cover NaN and infinite coordinates.
    if !(mag1.is_finite() && mag2.is_finite() && mag1 >= epsilon && mag2 >= epsilon) {
        return AngleReading::degenerate();
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = dot / (mag1 * mag2);
    if !cos_angle.is_finite() {
        return AngleReading::degenerate();
    }

    AngleReading {
        degrees: cos_angle.clamp(-1.0, 1.0).acos().to_degrees(),
        low_confidence: false,
    }
}

/// Angle over a resolved `[a, vertex, c]` triple.
pub fn triple_angle(points: [LandmarkPoint; 3], epsilon: f64) -> AngleReading {
    compute_angle_with_epsilon(points[0], points[1], points[2], epsilon)
}
