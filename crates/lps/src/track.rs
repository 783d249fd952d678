//! Per-packet tracking: decode, needle search and pose estimation.

use lps_core::Frame;
use lps_needle::{NeedleDetection, NeedleDetector};
use lps_qtm::{decode_packet, DecodeError, Packet, PacketType};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors that drop a single packet. The next packet is processed normally.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Frame metadata kept alongside a tracking outcome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub number: i32,
    pub timestamp_us: i64,
    pub quality: f32,
    pub marker_count: usize,
}

impl From<&Frame> for FrameInfo {
    fn from(frame: &Frame) -> Self {
        Self {
            number: frame.number,
            timestamp_us: frame.timestamp_us,
            quality: frame.quality,
            marker_count: frame.markers.len(),
        }
    }
}

/// Result of running one packet through decode, search and pose estimation.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackOutcome {
    /// The needle was found; the detection carries the pose.
    Detected {
        frame: FrameInfo,
        detection: NeedleDetection,
    },
    /// A valid marker frame without the needle in it.
    NoMatch { frame: FrameInfo },
    /// A packet that carries no marker frame.
    Ignored { packet_type: PacketType },
}

impl TrackOutcome {
    pub fn frame(&self) -> Option<&FrameInfo> {
        match self {
            Self::Detected { frame, .. } | Self::NoMatch { frame } => Some(frame),
            Self::Ignored { .. } => None,
        }
    }

    pub fn pose(&self) -> Option<&lps_core::Pose> {
        match self {
            Self::Detected { detection, .. } => Some(&detection.pose),
            _ => None,
        }
    }
}

/// Decode one packet and look for the needle in it.
///
/// Pure with respect to its inputs: no state survives between calls.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(len = bytes.len()))
)]
pub fn track_packet(bytes: &[u8], detector: &NeedleDetector) -> Result<TrackOutcome, TrackError> {
    let packet = decode_packet(bytes).inspect_err(|e| log::warn!("dropping packet: {e}"))?;
    let frame = match packet {
        Packet::Data(frame) => frame,
        Packet::Ignored { packet_type } => return Ok(TrackOutcome::Ignored { packet_type }),
    };

    let info = FrameInfo::from(&frame);
    Ok(match detector.detect(&frame) {
        Some(detection) => TrackOutcome::Detected {
            frame: info,
            detection,
        },
        None => TrackOutcome::NoMatch { frame: info },
    })
}
