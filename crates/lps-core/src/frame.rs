use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A single unlabeled 3D marker, in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Point3<f32>,
    /// Position of the marker inside the frame it was decoded from.
    ///
    /// The id reported by the tracking server is not carried over; every
    /// marker is treated as unlabeled.
    #[serde(default)]
    pub source_index: Option<usize>,
}

impl Marker {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            source_index: None,
        }
    }

    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = Some(index);
        self
    }

    /// Vector from `origin` to this marker.
    #[inline]
    pub fn offset_from(&self, origin: &Marker) -> Vector3<f32> {
        self.position - origin.position
    }

    /// Euclidean distance between two markers.
    #[inline]
    pub fn distance_to(&self, other: &Marker) -> f32 {
        self.offset_from(other).norm()
    }
}

impl From<Point3<f32>> for Marker {
    fn from(position: Point3<f32>) -> Self {
        Self {
            position,
            source_index: None,
        }
    }
}

/// One decoded marker frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame counter reported by the server. Non-decreasing on a healthy stream.
    pub number: i32,
    /// Device timestamp in microseconds.
    pub timestamp_us: i64,
    /// Stream quality in `[0, 1]`.
    pub quality: f32,
    pub markers: Vec<Marker>,
}

impl Frame {
    /// Combine the two 16-bit quality sub-metrics (each up to 1000) into `[0, 1]`.
    pub fn quality_from_metrics(drop_rate: i16, sync_quality: i16) -> f32 {
        (f32::from(drop_rate) + f32::from(sync_quality)) / 2000.0
    }

    #[inline]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quality_is_normalized_mean_of_metrics() {
        assert_relative_eq!(Frame::quality_from_metrics(1000, 1000), 1.0);
        assert_relative_eq!(Frame::quality_from_metrics(500, 1000), 0.75);
        assert_relative_eq!(Frame::quality_from_metrics(0, 0), 0.0);
    }

    #[test]
    fn marker_distance_is_euclidean() {
        let a = Marker::new(1.0, 2.0, 2.0);
        let b = Marker::new(0.0, 0.0, 0.0);
        assert_relative_eq!(a.distance_to(&b), 3.0);
        assert_relative_eq!(b.distance_to(&a), 3.0);
    }

    #[test]
    fn source_index_survives_json() {
        let m = Marker::new(0.5, -0.25, 1.0).with_source_index(4);
        let json = serde_json::to_string(&m).expect("serialize");
        let back: Marker = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, m);
    }
}
