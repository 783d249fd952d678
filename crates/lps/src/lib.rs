//! Facade crate for the `lps-*` workspace.
//!
//! This crate provides:
//! - re-exports of the wire, needle and core crates,
//! - [`track_packet`]: one transport payload in, one [`TrackOutcome`] out,
//! - [`FrameSequence`]: frame-number monotonicity monitor for a live stream,
//! - JSON configuration and replay reports ([`LpsConfig`], [`ReplayReport`]),
//! - (feature `cli`) the `lps` binary.
//!
//! ## Quickstart
//!
//! ```
//! use lps::qtm::FrameBuilder;
//! use lps::{track_packet, LpsConfig, TrackOutcome};
//!
//! let config: LpsConfig = serde_json::from_str(
//!     r#"{ "needle": { "markers": [[0.1, 0.0, 0.0], [0.0, 0.05, 0.0]] } }"#,
//! )?;
//! let detector = config.build_detector()?;
//!
//! let packet = FrameBuilder::new(1)
//!     .marker_m(1.0, 1.0, 0.0)
//!     .marker_m(1.1, 1.0, 0.0)
//!     .marker_m(1.0, 1.05, 0.0)
//!     .build();
//! match track_packet(&packet, &detector)? {
//!     TrackOutcome::Detected { detection, .. } => assert_eq!(detection.pose.frame_id, 1),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## API map
//! - `lps::core`: markers, frames, poses, logger.
//! - `lps::qtm`: binary cursor, packet decoder, control commands.
//! - `lps::needle`: needle calibration, correspondence search, pose estimation.

pub use lps_core as core;
pub use lps_needle as needle;
pub use lps_qtm as qtm;

pub use lps_core::{Frame, Marker, Pose};
pub use lps_needle::{NeedleDetection, NeedleDetector, NeedleSpec, PoseParams, SearchParams};

mod io;
mod replay;
mod sequence;
mod track;

pub use io::{LpsConfig, LpsConfigError, LpsIoError};
pub use replay::{replay_capture, PacketFailure, ReplayReport};
pub use sequence::{FrameSequence, SequenceCheck};
pub use track::{track_packet, FrameInfo, TrackError, TrackOutcome};
