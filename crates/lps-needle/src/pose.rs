//! Pose estimation from an accepted needle match.

use std::f32::consts::PI;

use lps_core::Pose;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::model::{direction_angles, NeedleModel};
use crate::search::NeedleMatch;

/// Output settings for pose estimation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseParams {
    /// Factor applied to the origin position, e.g. `10.0` to report decimeters.
    pub position_scale: f32,
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            position_scale: 1.0,
        }
    }
}

/// Estimate the needle pose from a match.
///
/// Position is the origin marker (scaled). Orientation is the per-angle mean
/// of the origin-to-slot directions minus the calibrated reference angles.
/// If no slot marker lies at positive `dx` from the origin, the yaw is
/// turned by `PI` to resolve the front/back ambiguity of the needle.
pub fn estimate_pose(
    matched: &NeedleMatch,
    needle: &NeedleModel,
    params: &PoseParams,
    frame_id: i32,
) -> Pose {
    let origin = matched.origin;
    let mut angle_sum = Vector3::<f32>::zeros();
    let mut do_flip = true;

    for slot in &matched.slots {
        let d = slot.marker.offset_from(&origin);
        if d.x > 0.0 {
            do_flip = false;
        }
        angle_sum += direction_angles(&d);
    }

    let count = matched.slots.len().max(1) as f32;
    let mut orientation = angle_sum / count - needle.reference_angles();
    if do_flip {
        orientation.z += PI;
    }

    Pose {
        position: origin.position * params.position_scale,
        orientation,
        frame_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NeedleSpec;
    use crate::search::{find_needle, SearchParams};
    use approx::assert_abs_diff_eq;
    use lps_core::Marker;
    use nalgebra::Point3;

    const EPS: f32 = 1e-5;

    fn needle() -> NeedleModel {
        NeedleModel::new(&NeedleSpec::new(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]))
        .expect("needle")
    }

    fn pose_of(haystack: &[Marker], params: &PoseParams) -> Pose {
        let model = needle();
        let search = SearchParams {
            search_margin: 0.1,
            unique_markers: false,
        };
        let m = find_needle(haystack, &model, &search).expect("match");
        estimate_pose(&m, &model, params, 3)
    }

    #[test]
    fn calibrated_pose_has_zero_orientation() {
        let haystack = [
            Marker::new(0.5, 0.5, 0.2),
            Marker::new(1.5, 0.5, 0.2),
            Marker::new(0.5, 2.5, 0.2),
        ];
        let pose = pose_of(&haystack, &PoseParams::default());
        assert_abs_diff_eq!(pose.position, Point3::new(0.5, 0.5, 0.2), epsilon = EPS);
        assert_abs_diff_eq!(pose.roll(), 0.0, epsilon = EPS);
        assert_abs_diff_eq!(pose.pitch(), 0.0, epsilon = EPS);
        assert_abs_diff_eq!(pose.yaw(), 0.0, epsilon = EPS);
        assert_eq!(pose.frame_id, 3);
    }

    #[test]
    fn half_turn_about_vertical_axis_flips_yaw_by_pi() {
        let upright = [
            Marker::new(0.0, 0.0, 0.0),
            Marker::new(1.0, 0.0, 0.0),
            Marker::new(0.0, 2.0, 0.0),
        ];
        let turned = [
            Marker::new(0.0, 0.0, 0.0),
            Marker::new(-1.0, 0.0, 0.0),
            Marker::new(0.0, -2.0, 0.0),
        ];

        let a = pose_of(&upright, &PoseParams::default());
        let b = pose_of(&turned, &PoseParams::default());
        assert_abs_diff_eq!(a.yaw(), 0.0, epsilon = EPS);
        assert_abs_diff_eq!(b.yaw(), PI, epsilon = EPS);
        assert_abs_diff_eq!(b.yaw() - a.yaw(), PI, epsilon = EPS);
    }

    #[test]
    fn one_positive_dx_disables_the_flip() {
        let model = needle();
        let origin = Marker::new(0.0, 0.0, 0.0);
        let slot = |x: f32, y: f32| crate::search::SlotMatch {
            index: 0,
            marker: Marker::new(x, y, 0.0),
            distance: 0.0,
            error: 0.0,
        };

        // Only the second slot has dx > 0: no flip, same as an all-positive case.
        let mixed = NeedleMatch {
            origin_index: 0,
            origin,
            slots: vec![slot(-1.0, 0.0), slot(0.5, 2.0)],
        };
        let expected_yaw = (PI + 2.0f32.atan2(0.5)) / 2.0 - model.reference_angles().z;
        let pose = estimate_pose(&mixed, &model, &PoseParams::default(), 0);
        assert_abs_diff_eq!(pose.yaw(), expected_yaw, epsilon = EPS);

        // dx == 0 does not count as positive.
        let zero_dx = NeedleMatch {
            origin_index: 0,
            origin,
            slots: vec![slot(0.0, 1.0), slot(0.0, 2.0)],
        };
        let expected_yaw = std::f32::consts::FRAC_PI_2 - model.reference_angles().z + PI;
        let pose = estimate_pose(&zero_dx, &model, &PoseParams::default(), 0);
        assert_abs_diff_eq!(pose.yaw(), expected_yaw, epsilon = EPS);
    }

    #[test]
    fn position_is_scaled() {
        let haystack = [
            Marker::new(0.1, 0.2, 0.3),
            Marker::new(1.1, 0.2, 0.3),
            Marker::new(0.1, 2.2, 0.3),
        ];
        let params = PoseParams {
            position_scale: 10.0,
        };
        let pose = pose_of(&haystack, &params);
        assert_abs_diff_eq!(pose.position, Point3::new(1.0, 2.0, 3.0), epsilon = EPS);
    }
}
