use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Estimated position and orientation of the tracked rigid body for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the needle origin marker, in deployment units.
    pub position: Point3<f32>,
    /// Roll, pitch and yaw in radians, relative to the calibrated neutral pose.
    pub orientation: Vector3<f32>,
    /// Number of the frame this pose was estimated from.
    pub frame_id: i32,
}

impl Pose {
    #[inline]
    pub fn roll(&self) -> f32 {
        self.orientation.x
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.orientation.y
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.orientation.z
    }
}
