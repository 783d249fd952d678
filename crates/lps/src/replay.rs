//! Offline replay of a recorded packet stream.

use std::fs;
use std::path::Path;

use lps_core::Pose;
use lps_needle::NeedleDetector;
use lps_qtm::split_packets;
use serde::{Deserialize, Serialize};

use crate::io::LpsIoError;
use crate::sequence::{FrameSequence, SequenceCheck};
use crate::track::{track_packet, FrameInfo, TrackOutcome};

/// A packet that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketFailure {
    /// Position of the packet in the capture.
    pub index: usize,
    pub message: String,
}

/// Summary of a replayed capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Packets delimited in the capture, including failed ones.
    pub packets: usize,
    /// Marker frames decoded successfully.
    pub frames: Vec<FrameInfo>,
    pub poses: Vec<Pose>,
    /// Frame numbers with a valid frame but no needle.
    pub no_match: Vec<i32>,
    /// Non-data packets skipped.
    pub ignored: usize,
    #[serde(default)]
    pub failures: Vec<PacketFailure>,
    pub sequence_regressions: usize,
}

impl ReplayReport {
    /// Share of decoded frames in which the needle was found.
    pub fn detection_rate(&self) -> f32 {
        if self.frames.is_empty() {
            0.0
        } else {
            self.poses.len() as f32 / self.frames.len() as f32
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LpsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Replay concatenated packets through the tracker.
///
/// Each packet is tracked independently; a failing packet is recorded and
/// skipped. A truncated tail ends the replay.
pub fn replay_capture(capture: &[u8], detector: &NeedleDetector) -> ReplayReport {
    let mut report = ReplayReport::default();
    let mut sequence = FrameSequence::new();

    for (index, packet) in split_packets(capture).enumerate() {
        report.packets += 1;
        let packet = match packet {
            Ok(p) => p,
            Err(e) => {
                log::warn!("capture truncated at packet {index}: {e}");
                report.failures.push(PacketFailure {
                    index,
                    message: e.to_string(),
                });
                break;
            }
        };

        let outcome = match track_packet(packet, detector) {
            Ok(o) => o,
            Err(e) => {
                report.failures.push(PacketFailure {
                    index,
                    message: e.to_string(),
                });
                continue;
            }
        };

        if let Some(frame) = outcome.frame() {
            if let SequenceCheck::Advanced { skipped } = sequence.observe(frame.number) {
                if skipped > 0 {
                    log::debug!("{skipped} frames missing before frame {}", frame.number);
                }
            }
            report.frames.push(*frame);
        }

        match outcome {
            TrackOutcome::Detected { detection, .. } => report.poses.push(detection.pose),
            TrackOutcome::NoMatch { frame } => report.no_match.push(frame.number),
            TrackOutcome::Ignored { .. } => report.ignored += 1,
        }
    }

    report.sequence_regressions = sequence.regressions();
    log::info!(
        "replayed {} packets: {} frames, {} poses, {} failures",
        report.packets,
        report.frames.len(),
        report.poses.len(),
        report.failures.len()
    );
    report
}
