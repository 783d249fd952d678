//! Needle calibration: the distance/orientation signature of the rigid body.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Reference markers required besides the implicit origin.
pub const MIN_NEEDLE_MARKERS: usize = 2;

/// Needle geometry as configured.
///
/// `markers` are the non-origin reference markers (e.g. a forward and a
/// leftward marker), in meters. They are taken relative to `origin`, which
/// defaults to `(0, 0, 0)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedleSpec {
    #[serde(default = "default_origin")]
    pub origin: Point3<f32>,
    pub markers: Vec<Point3<f32>>,
}

fn default_origin() -> Point3<f32> {
    Point3::origin()
}

impl NeedleSpec {
    pub fn new(markers: Vec<Point3<f32>>) -> Self {
        Self {
            origin: Point3::origin(),
            markers,
        }
    }
}

/// Needle configuration and tracker parameter errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NeedleError {
    #[error("needle needs at least {required} reference markers besides the origin, got {got}")]
    TooFewMarkers { got: usize, required: usize },
    #[error("needle marker {index} coincides with the origin")]
    DegenerateMarker { index: usize },
    #[error("needle marker {index} has non-finite coordinates")]
    NonFinite { index: usize },
    #[error("search margin must be finite and >= 0, got {0}")]
    InvalidSearchMargin(f32),
    #[error("position scale must be finite and non-zero, got {0}")]
    InvalidPositionScale(f32),
}

/// Roll, pitch and yaw of a direction vector: `atan2(y, z)`, `atan2(z, x)`, `atan2(y, x)`.
#[inline]
pub fn direction_angles(v: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.y.atan2(v.z), v.z.atan2(v.x), v.y.atan2(v.x))
}

/// Calibrated needle signature, shared read-only by every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedleModel {
    /// Reference markers relative to the origin, in slot order.
    markers: Vec<Vector3<f32>>,
    /// Distance from the origin to each reference marker, in slot order.
    distances: Vec<f32>,
    /// Mean roll/pitch/yaw over the reference markers.
    ///
    /// This is a per-angle arithmetic mean, not a rotation average; it is only
    /// meaningful as an offset for the same fixed marker layout.
    reference_angles: Vector3<f32>,
}

impl NeedleModel {
    /// Calibrate from a needle specification.
    pub fn new(spec: &NeedleSpec) -> Result<Self, NeedleError> {
        if spec.markers.len() < MIN_NEEDLE_MARKERS {
            return Err(NeedleError::TooFewMarkers {
                got: spec.markers.len(),
                required: MIN_NEEDLE_MARKERS,
            });
        }

        let mut markers = Vec::with_capacity(spec.markers.len());
        let mut distances = Vec::with_capacity(spec.markers.len());
        let mut angle_sum = Vector3::<f32>::zeros();

        for (index, m) in spec.markers.iter().enumerate() {
            let v = m - spec.origin;
            if !v.iter().all(|c| c.is_finite()) {
                return Err(NeedleError::NonFinite { index });
            }
            let distance = v.norm();
            if distance <= f32::EPSILON {
                return Err(NeedleError::DegenerateMarker { index });
            }
            angle_sum += direction_angles(&v);
            markers.push(v);
            distances.push(distance);
        }

        let reference_angles = angle_sum / markers.len() as f32;
        log::info!(
            "needle calibrated: distances {:?}, reference angles (roll {:.4}, pitch {:.4}, yaw {:.4})",
            distances,
            reference_angles.x,
            reference_angles.y,
            reference_angles.z
        );

        Ok(Self {
            markers,
            distances,
            reference_angles,
        })
    }

    /// Number of distance slots to fill during the search.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    #[inline]
    pub fn markers(&self) -> &[Vector3<f32>] {
        &self.markers
    }

    /// Mean (roll, pitch, yaw) of the reference markers.
    #[inline]
    pub fn reference_angles(&self) -> Vector3<f32> {
        self.reference_angles
    }
}
