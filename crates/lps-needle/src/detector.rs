use lps_core::{Frame, Marker, Pose};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::model::{NeedleError, NeedleModel, NeedleSpec};
use crate::pose::{estimate_pose, PoseParams};
use crate::search::{find_needle, NeedleMatch, SearchParams};

/// Pose together with the markers it was estimated from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeedleDetection {
    pub pose: Pose,
    pub matched: NeedleMatch,
}

/// Calibrated needle plus search and pose settings.
///
/// Detection borrows the detector immutably and keeps all search state on the
/// stack, so one detector can serve any number of threads.
#[derive(Clone, Debug)]
pub struct NeedleDetector {
    model: NeedleModel,
    search: SearchParams,
    pose: PoseParams,
}

impl NeedleDetector {
    /// Calibrate the needle and validate the parameters.
    pub fn new(
        spec: &NeedleSpec,
        search: SearchParams,
        pose: PoseParams,
    ) -> Result<Self, NeedleError> {
        if !search.search_margin.is_finite() || search.search_margin < 0.0 {
            return Err(NeedleError::InvalidSearchMargin(search.search_margin));
        }
        if !pose.position_scale.is_finite() || pose.position_scale == 0.0 {
            return Err(NeedleError::InvalidPositionScale(pose.position_scale));
        }
        let model = NeedleModel::new(spec)?;
        Ok(Self {
            model,
            search,
            pose,
        })
    }

    #[inline]
    pub fn model(&self) -> &NeedleModel {
        &self.model
    }

    #[inline]
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    #[inline]
    pub fn pose_params(&self) -> &PoseParams {
        &self.pose
    }

    /// Locate the needle in `markers` and estimate its pose, keeping the
    /// matched haystack markers alongside it.
    pub fn detect_markers_with_match(
        &self,
        markers: &[Marker],
        frame_id: i32,
    ) -> Option<NeedleDetection> {
        let matched = find_needle(markers, &self.model, &self.search)?;
        if matched.has_shared_markers() {
            log::debug!(
                "frame {frame_id}: needle match {:?} reuses a marker across slots",
                matched.indices()
            );
        }
        let pose = estimate_pose(&matched, &self.model, &self.pose, frame_id);
        Some(NeedleDetection { pose, matched })
    }

    /// Pose only; see [`Self::detect_markers_with_match`].
    pub fn detect_markers(&self, markers: &[Marker], frame_id: i32) -> Option<Pose> {
        self.detect_markers_with_match(markers, frame_id)
            .map(|d| d.pose)
    }

    /// Run detection on a decoded frame; the pose is stamped with the frame number.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(frame = frame.number, markers = frame.markers.len()))
    )]
    pub fn detect(&self, frame: &Frame) -> Option<NeedleDetection> {
        let detection = self.detect_markers_with_match(&frame.markers, frame.number);
        if detection.is_none() {
            log::debug!(
                "frame {}: needle not found among {} markers",
                frame.number,
                frame.markers.len()
            );
        }
        detection
    }
}
