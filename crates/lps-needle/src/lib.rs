//! Needle tracking over an unlabeled marker cloud.
//!
//! ## Quickstart
//!
//! ```
//! use lps_core::Marker;
//! use lps_needle::{NeedleDetector, NeedleSpec, PoseParams, SearchParams};
//! use nalgebra::Point3;
//!
//! let spec = NeedleSpec::new(vec![Point3::new(0.10, 0.0, 0.0), Point3::new(0.0, 0.05, 0.0)]);
//! let detector = NeedleDetector::new(&spec, SearchParams::default(), PoseParams::default())
//!     .expect("valid needle");
//!
//! let haystack = [
//!     Marker::new(1.0, 1.0, 0.0),
//!     Marker::new(1.1, 1.0, 0.0),
//!     Marker::new(1.0, 1.05, 0.0),
//! ];
//! let pose = detector.detect_markers(&haystack, 17).expect("needle in haystack");
//! assert_eq!(pose.frame_id, 17);
//! ```
//!
//! Pipeline:
//! 1. Calibrate once: distances from the implicit origin to each reference
//!    marker, plus the mean roll/pitch/yaw of the reference markers.
//! 2. Per frame, try every marker as the origin and fill each distance slot
//!    with the closest-distance marker inside the search margin.
//! 3. The first origin that fills every slot is the match; its markers give
//!    position and orientation relative to the calibrated pose.

mod detector;
mod model;
mod pose;
mod search;

pub use detector::{NeedleDetection, NeedleDetector};
pub use model::{direction_angles, NeedleError, NeedleModel, NeedleSpec, MIN_NEEDLE_MARKERS};
pub use pose::{estimate_pose, PoseParams};
pub use search::{find_needle, NeedleMatch, SearchParams, SlotMatch};
